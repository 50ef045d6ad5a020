//! Field plans: the immutable, per-type, per-namespace descriptor lists.
//!
//! A plan is built once from a record type's static field table and cached
//! process-wide. Plans are read-only after construction and safe to share
//! across concurrent decode/encode operations; the cache publishes each plan
//! behind an `Arc` only after it is fully built.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use thiserror::Error;
use tracing::debug;

use crate::field::{FieldDescriptor, FieldSpec, Namespace};
use crate::record::Record;

/// A record type's field table is structurally unusable for a namespace.
///
/// The derive macro cannot produce such tables (non-composite types and
/// untranscodable field types are compile errors there); this surfaces
/// malformed hand-written [`Record`] implementations at plan-build time
/// rather than per request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// Two fields carry the same source key within one namespace.
    #[error("fields {first:?} and {second:?} share the source key {key:?} in namespace {namespace}")]
    DuplicateKey {
        /// The first field carrying the key.
        first: &'static str,
        /// The second field carrying the key.
        second: &'static str,
        /// The shared key.
        key: &'static str,
        /// The namespace the collision occurred in.
        namespace: Namespace,
    },
}

/// The immutable, ordered field plan for one `(record type, namespace)`
/// pair.
#[derive(Debug)]
pub struct FieldPlan {
    namespace: Namespace,
    fields: Vec<FieldDescriptor>,
}

impl FieldPlan {
    /// Build a plan from a static field table, without caching.
    ///
    /// Fields without a key for `namespace` (or with the skip sentinel) are
    /// excluded. Plan order is field-table order.
    ///
    /// # Errors
    ///
    /// Returns a [`PlanError`] if two fields share a source key within
    /// `namespace`.
    pub fn from_specs(
        namespace: Namespace,
        specs: &'static [FieldSpec],
    ) -> Result<Self, PlanError> {
        let mut fields: Vec<FieldDescriptor> = Vec::new();
        for spec in specs {
            let Some(key) = spec.key(namespace) else {
                continue;
            };
            if let Some(existing) = fields.iter().find(|field| field.key == key) {
                return Err(PlanError::DuplicateKey {
                    first: existing.name,
                    second: spec.name,
                    key,
                    namespace,
                });
            }
            fields.push(FieldDescriptor::new(spec, namespace, key));
        }
        Ok(Self { namespace, fields })
    }

    /// The namespace this plan was built for.
    #[must_use]
    pub const fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// The plan's descriptors, in plan order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Number of fields participating in this namespace.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field of the record participates in this namespace.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

type PlanKey = (TypeId, Namespace);
type PlanCache = RwLock<HashMap<PlanKey, Arc<FieldPlan>>>;

static PLAN_CACHE: OnceLock<PlanCache> = OnceLock::new();

/// The cached field plan for record type `T` and `namespace`.
///
/// The first call per `(type, namespace)` pair builds the plan; later calls
/// return the same `Arc`. Insertion is guarded so concurrent first calls
/// agree on one plan and no caller observes a partially built one.
///
/// # Errors
///
/// Returns a [`PlanError`] if `T`'s field table is structurally unusable
/// for `namespace`.
pub fn plan_for<T: Record + 'static>(namespace: Namespace) -> Result<Arc<FieldPlan>, PlanError> {
    let cache = PLAN_CACHE.get_or_init(|| RwLock::new(HashMap::new()));
    let key = (TypeId::of::<T>(), namespace);

    {
        let map = cache.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(plan) = map.get(&key) {
            return Ok(Arc::clone(plan));
        }
    }

    // Build outside the write lock; racing builders produce identical plans
    // and the first insertion wins.
    let built = Arc::new(FieldPlan::from_specs(namespace, T::field_specs())?);
    debug!(
        record = std::any::type_name::<T>(),
        %namespace,
        fields = built.len(),
        "built field plan"
    );

    let mut map = cache.write().unwrap_or_else(PoisonError::into_inner);
    Ok(Arc::clone(map.entry(key).or_insert(built)))
}
