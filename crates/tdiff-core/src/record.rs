//! Differ for records with a fixed set of named fields.

use std::sync::Arc;

use tdiff_types::{
    DiffResult, DifferOp, MatchType, Presence, RecordResult, UpdateError, UpdatePath,
    UpdateResult, UpdateStep,
};
use tracing::debug;

use crate::differ::{rejected, Differ, DifferRef};

/// One field slot: an accessor paired with the differ for the field's type.
///
/// The field type is erased here so a record can hold children of different
/// value types under one ordered list.
trait FieldSlot<T>: Send + Sync {
    fn diff_field(&self, input: Presence<&T>) -> DiffResult;

    fn update_field(
        &self,
        path: &UpdatePath,
        op: &DifferOp,
    ) -> UpdateResult<Arc<dyn FieldSlot<T>>>;
}

struct Accessed<T, F> {
    get: Arc<dyn Fn(&T) -> &F + Send + Sync>,
    differ: DifferRef<F>,
}

impl<T: 'static, F: 'static> FieldSlot<T> for Accessed<T, F> {
    fn diff_field(&self, input: Presence<&T>) -> DiffResult {
        self.differ.diff(input.map(|record| (self.get)(record)))
    }

    fn update_field(
        &self,
        path: &UpdatePath,
        op: &DifferOp,
    ) -> UpdateResult<Arc<dyn FieldSlot<T>>> {
        let differ = self.differ.update_with(path, op)?;
        Ok(Arc::new(Accessed {
            get: Arc::clone(&self.get),
            differ,
        }))
    }
}

struct Field<T> {
    name: String,
    slot: Arc<dyn FieldSlot<T>>,
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            slot: Arc::clone(&self.slot),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordDiffer
// ---------------------------------------------------------------------------

/// Compares records field by field, in declaration order.
pub struct RecordDiffer<T> {
    type_name: Arc<str>,
    fields: Vec<Field<T>>,
    is_ignored: bool,
}

impl<T> Clone for RecordDiffer<T> {
    fn clone(&self) -> Self {
        Self {
            type_name: Arc::clone(&self.type_name),
            fields: self.fields.clone(),
            is_ignored: self.is_ignored,
        }
    }
}

impl<T: 'static> RecordDiffer<T> {
    /// Start building a record differ named `type_name`.
    pub fn builder(type_name: impl Into<String>) -> RecordDifferBuilder<T> {
        RecordDifferBuilder {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }
}

impl<T> RecordDiffer<T> {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn is_ignored(&self) -> bool {
        self.is_ignored
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    fn with_ignored(&self, ignored: bool) -> Self {
        Self {
            is_ignored: ignored,
            ..self.clone()
        }
    }
}

impl<T: 'static> Differ<T> for RecordDiffer<T> {
    fn diff(&self, input: Presence<&T>) -> DiffResult {
        let fields: Vec<(String, DiffResult)> = self
            .fields
            .iter()
            .map(|field| (field.name.clone(), field.slot.diff_field(input)))
            .collect();
        let all_ok = fields.iter().all(|(_, result)| result.is_ok());

        // A one-sided record is judged by its fields alone; the record's own
        // ignored flag only gates two-sided comparisons.
        let match_type = input.match_type();
        let is_ok = match match_type {
            MatchType::Both => self.is_ignored || all_ok,
            MatchType::ActualOnly | MatchType::ExpectedOnly => all_ok,
        };

        DiffResult::Record(RecordResult {
            type_name: self.type_name.to_string(),
            fields,
            is_ok,
            is_ignored: self.is_ignored,
            match_type,
        })
    }

    fn update_with(&self, path: &UpdatePath, op: &DifferOp) -> UpdateResult<DifferRef<T>> {
        let Some((step, rest)) = path.next() else {
            return match op {
                DifferOp::SetIgnored(ignored) => {
                    debug!(differ = %self.type_name, ignored, "record ignored flag set");
                    Ok(Arc::new(self.with_ignored(*ignored)))
                }
                DifferOp::MatchBy(_) => rejected(UpdateError::InvalidDifferOp {
                    differ: self.type_name.to_string(),
                    op: op.to_string(),
                }),
            };
        };

        let UpdateStep::RecordField(name) = step else {
            return rejected(UpdateError::UnexpectedDifferType {
                differ: self.type_name.to_string(),
                step: step.to_string(),
            });
        };

        let Some(idx) = self.fields.iter().position(|f| &f.name == name) else {
            return rejected(UpdateError::NonExistentField {
                differ: self.type_name.to_string(),
                field: name.clone(),
                known: self.fields.iter().map(|f| f.name.clone()).collect(),
            });
        };

        debug!(differ = %self.type_name, field = %name, "routing update into record field");
        let slot = self.fields[idx].slot.update_field(&rest, op)?;

        let mut fields = self.fields.clone();
        fields[idx] = Field {
            name: name.clone(),
            slot,
        };
        Ok(Arc::new(Self {
            type_name: Arc::clone(&self.type_name),
            fields,
            is_ignored: self.is_ignored,
        }))
    }
}

// ---------------------------------------------------------------------------
// RecordDifferBuilder
// ---------------------------------------------------------------------------

/// Builds a [`RecordDiffer`] one field at a time.
///
/// Fields keep the order in which they are added. Adding a field whose name
/// is already present replaces the earlier definition in its original
/// position.
pub struct RecordDifferBuilder<T> {
    type_name: String,
    fields: Vec<Field<T>>,
}

impl<T: 'static> RecordDifferBuilder<T> {
    /// Add a field read through `get` and compared with `differ`.
    pub fn field<F: 'static>(
        mut self,
        name: impl Into<String>,
        get: impl Fn(&T) -> &F + Send + Sync + 'static,
        differ: impl Differ<F> + 'static,
    ) -> Self {
        let field = Field {
            name: name.into(),
            slot: Arc::new(Accessed {
                get: Arc::new(get),
                differ: Arc::new(differ),
            }),
        };
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    pub fn build(self) -> RecordDiffer<T> {
        RecordDiffer {
            type_name: Arc::from(self.type_name),
            fields: self.fields,
            is_ignored: false,
        }
    }
}
