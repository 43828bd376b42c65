//! Field plans: the cached, ordered view of a record's fields.
use {
    super::{coders::Coders, Engine},
    crate::{
        reflect::{Kind, Shape},
        tag::Tag,
    },
    core::any::TypeId,
    std::sync::Arc,
    tracing::debug,
};

/// One field a record is encoded and decoded through.
pub(crate) struct Field<E: Tag> {
    /// Position among the record's reflected fields.
    pub(crate) index: usize,
    pub(crate) name: &'static str,
    pub(crate) type_name: &'static str,
    /// `None` when the field carries no tag for this engine.
    pub(crate) options: Option<E::Options>,
    pub(crate) omit_empty: bool,
    pub(crate) kind: FieldKind<E>,
}

pub(crate) enum FieldKind<E: Tag> {
    Leaf(Arc<Coders<E>>),
    /// Flattened record; its fields are walked inline.
    Embedded {
        plan: Arc<FieldPlan<E>>,
        record: &'static str,
    },
}

pub(crate) type FieldPlan<E> = [Field<E>];

impl<E: Tag> Engine<E> {
    /// The field plan of the record described by `shape`.
    pub(crate) fn fields(&self, shape: &Shape) -> Arc<FieldPlan<E>> {
        self.fields_along(shape, &mut Vec::new())
    }

    /// `chain` holds the records whose plans are being built further up,
    /// innermost last.
    fn fields_along(&self, shape: &Shape, chain: &mut Vec<TypeId>) -> Arc<FieldPlan<E>> {
        if let Some(plan) = self.plan_cache.get(&shape.id) {
            return plan.value().clone();
        }
        chain.push(shape.id);
        let plan = self.build_plan(shape, chain);
        chain.pop();
        debug!(tag = %self.name, ty = shape.name, fields = plan.len(), "resolved field plan");
        self.plan_cache
            .entry(shape.id)
            .or_insert(plan)
            .value()
            .clone()
    }

    fn build_plan(&self, shape: &Shape, chain: &mut Vec<TypeId>) -> Arc<FieldPlan<E>> {
        let Kind::Record(list) = shape.kind else {
            return Arc::from(Vec::new());
        };
        let infos = list();
        let mut plan = Vec::with_capacity(infos.len());

        for info in infos {
            let field_shape = (info.shape)();

            if info.embedded {
                let target = field_shape.pointee();
                if target.is_record() {
                    let kind = if chain.contains(&target.id) {
                        debug!(
                            tag = %self.name,
                            ty = shape.name,
                            field = info.name,
                            "embedded record {} is already being flattened",
                            target.name
                        );
                        FieldKind::Leaf(Arc::new(Coders::recursive_embedding(target.name)))
                    } else {
                        let nested = self.fields_along(&target, chain);
                        if nested.is_empty() {
                            continue;
                        }
                        FieldKind::Embedded {
                            plan: nested,
                            record: target.name,
                        }
                    };
                    plan.push(Field {
                        index: info.index,
                        name: info.name,
                        type_name: field_shape.name,
                        options: None,
                        omit_empty: false,
                        kind,
                    });
                    continue;
                }
                // Embedded non-records of hidden types carry nothing reachable;
                // public ones are plain fields.
                if !info.exported {
                    continue;
                }
            } else if !info.exported {
                continue;
            }

            let mut options = None;
            let mut omit_empty = false;
            if let Some(value) = info.lookup(&self.name) {
                if value == "-" {
                    continue;
                }
                let mut parsed = E::Options::default();
                match self.tag.parse(value, &mut parsed) {
                    Ok(omit) => {
                        options = Some(parsed);
                        omit_empty = omit;
                    }
                    Err(err) => {
                        let cause: crate::BoxError = err.into();
                        debug!(
                            tag = %self.name,
                            ty = shape.name,
                            field = info.name,
                            "malformed tag {value:?}: {cause}"
                        );
                        plan.push(Field {
                            index: info.index,
                            name: info.name,
                            type_name: field_shape.name,
                            options: None,
                            omit_empty: false,
                            kind: FieldKind::Leaf(Arc::new(Coders::invalid_tag(
                                value,
                                shape.name,
                                info.name,
                                Arc::from(cause),
                            ))),
                        });
                        break;
                    }
                }
            }

            plan.push(Field {
                index: info.index,
                name: info.name,
                type_name: field_shape.name,
                options,
                omit_empty,
                kind: FieldKind::Leaf(self.coders(&field_shape)),
            });
        }

        Arc::from(plan)
    }
}
