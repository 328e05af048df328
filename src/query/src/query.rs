//! Component query trait
//!
//! Every query filters one kind of component with a name criterion plus any
//! number of query-specific criteria. A candidate is yielded only when every
//! enabled criterion passes.

use crate::criteria::{NameCriterion, NameOptions};
use crate::error::Result;
use policyq_core::Component;
use tracing::{debug, info};

/// Query over one kind of policy component
pub trait ComponentQuery {
    /// Component kind yielded by the query
    type Item: Component;

    /// Human readable kind, used in log messages
    const KIND: &'static str;

    /// Name criterion
    fn name_criterion(&self) -> &NameCriterion;

    /// Mutable name criterion
    fn name_criterion_mut(&mut self) -> &mut NameCriterion;

    /// Components considered by the query, in policy order
    ///
    /// Called once per [`results`](Self::results) request.
    fn candidates(&self) -> impl Iterator<Item = Self::Item> + '_;

    /// Whether a candidate passes every configured criterion
    fn matches(&self, candidate: &Self::Item) -> bool;

    /// Log the active criteria at debug level
    fn log_criteria(&self);

    /// Set the name criterion
    ///
    /// `None` disables name matching.
    fn set_name(&mut self, name: Option<&str>, options: NameOptions) -> Result<()> {
        self.name_criterion_mut().set(name, options)?;
        debug!("{} name criterion set to {:?}", Self::KIND, name);
        Ok(())
    }

    /// Lazily yield every matching component
    ///
    /// Each call starts a fresh pass over the policy, so results always
    /// reflect the current criteria. Dropping the iterator early stops all
    /// further evaluation.
    fn results(&self) -> impl Iterator<Item = Self::Item> + '_ {
        info!("Generating {} results", Self::KIND);
        self.log_criteria();
        self.candidates().filter(move |candidate| self.matches(candidate))
    }
}
