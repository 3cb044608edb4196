use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::application::ports::branch_service::BranchService;
use crate::application::ports::reload_signal::{ReloadReason, ReloadSignal};
use crate::application::use_cases::branches::checkout_branch::CheckoutBranch;
use crate::application::use_cases::branches::create_branch::CreateBranch;
use crate::application::use_cases::branches::discard_changes::DiscardChanges;
use crate::application::use_cases::branches::errors::{BranchFailure, BranchOperationError};
use crate::domain::branches::branch::Branch;
use crate::domain::branches::repo_status::{RepoStatus, UncommittedChangesError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchOperationsState {
    pub uncommitted_changes_error: Option<UncommittedChangesError>,
    pub create_error: Option<BranchFailure>,
    pub checkout_error: Option<BranchFailure>,
    pub current_branch: Option<String>,
}

// Which inline error slot a failed checkout is reported in.
#[derive(Debug, Clone, Copy)]
enum ErrorSlot {
    Create,
    Checkout,
}

/// Counts an operation as in flight until dropped, including when the future is cancelled.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Creates, checks out and recovers branches for one editing surface.
///
/// Outcomes are both returned and mirrored into observable state so a view can render them
/// after the fact. Operations are not serialized: overlapping calls each run to completion and
/// `is_loading` stays true while any of them is pending.
pub struct BranchOperations {
    org: String,
    app: String,
    service: Arc<dyn BranchService>,
    reload: Arc<dyn ReloadSignal>,
    state: Mutex<BranchOperationsState>,
    in_flight: AtomicUsize,
}

impl BranchOperations {
    pub fn new(
        org: &str,
        app: &str,
        service: Arc<dyn BranchService>,
        reload: Arc<dyn ReloadSignal>,
    ) -> Self {
        Self {
            org: org.to_string(),
            app: app.to_string(),
            service,
            reload,
            state: Mutex::new(BranchOperationsState::default()),
            in_flight: AtomicUsize::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, BranchOperationsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn snapshot(&self) -> BranchOperationsState {
        self.state().clone()
    }

    pub fn uncommitted_changes_error(&self) -> Option<UncommittedChangesError> {
        self.state().uncommitted_changes_error.clone()
    }

    pub fn create_error(&self) -> Option<BranchFailure> {
        self.state().create_error.clone()
    }

    /// Empty when there is nothing to show.
    pub fn create_error_message(&self) -> String {
        self.state()
            .create_error
            .as_ref()
            .map(|f| f.message.clone())
            .unwrap_or_default()
    }

    pub fn checkout_error(&self) -> Option<BranchFailure> {
        self.state().checkout_error.clone()
    }

    pub fn current_branch(&self) -> Option<String> {
        self.state().current_branch.clone()
    }

    /// Dismisses the uncommitted-changes dialog. Returns the conflict that was showing, if any;
    /// a create-branch flow blocked on it is finished at this point (the branch exists, it just
    /// is not checked out).
    pub fn clear_uncommitted_changes_error(&self) -> Option<UncommittedChangesError> {
        self.state().uncommitted_changes_error.take()
    }

    pub async fn refresh_current_branch(&self) -> Result<String, BranchOperationError> {
        let info = self
            .service
            .current_branch(&self.org, &self.app)
            .await
            .map_err(BranchOperationError::StatusUnavailable)?;
        self.state().current_branch = Some(info.branch_name.clone());
        Ok(info.branch_name)
    }

    pub async fn repo_status(&self) -> Result<RepoStatus, BranchOperationError> {
        self.service
            .repo_status(&self.org, &self.app)
            .await
            .map_err(BranchOperationError::StatusUnavailable)
    }

    pub async fn list_branches(&self) -> Result<Vec<Branch>, BranchOperationError> {
        self.service
            .list_branches(&self.org, &self.app)
            .await
            .map_err(BranchOperationError::StatusUnavailable)
    }

    pub async fn checkout_existing_branch(
        &self,
        branch_name: &str,
    ) -> Result<RepoStatus, BranchOperationError> {
        let _busy = InFlight::enter(&self.in_flight);
        self.state().checkout_error = None;
        self.checkout(branch_name, ErrorSlot::Checkout).await
    }

    /// Creates `branch_name` and switches to it. A failed create never attempts the checkout.
    pub async fn checkout_new_branch(
        &self,
        branch_name: &str,
    ) -> Result<RepoStatus, BranchOperationError> {
        let _busy = InFlight::enter(&self.in_flight);
        self.state().create_error = None;

        let create = CreateBranch {
            service: self.service.as_ref(),
        };
        if let Err(e) = create.execute(&self.org, &self.app, branch_name).await {
            tracing::warn!(branch = %branch_name, error = %e, "create_branch_failed");
            self.state().create_error = Some(BranchFailure::from(&e));
            return Err(e);
        }
        tracing::info!(branch = %branch_name, "branch_created");
        self.checkout(branch_name, ErrorSlot::Create).await
    }

    /// Throws away local modifications, then retries the checkout that they blocked. When the
    /// discard fails the pending uncommitted-changes error is left as it is.
    pub async fn discard_changes_and_checkout(
        &self,
        target_branch: &str,
    ) -> Result<RepoStatus, BranchOperationError> {
        let _busy = InFlight::enter(&self.in_flight);
        let discard = DiscardChanges {
            service: self.service.as_ref(),
        };
        if let Err(e) = discard.execute(&self.org, &self.app).await {
            tracing::error!(target = %target_branch, error = ?e, "discard_changes_failed");
            return Err(e);
        }
        tracing::info!(target = %target_branch, "local_changes_discarded");
        self.checkout_existing_branch(target_branch).await
    }

    async fn checkout(
        &self,
        branch_name: &str,
        slot: ErrorSlot,
    ) -> Result<RepoStatus, BranchOperationError> {
        let already_current = self.state().current_branch.as_deref() == Some(branch_name);
        if already_current {
            let err = BranchOperationError::AlreadyOnBranch {
                branch: branch_name.to_string(),
            };
            self.record_failure(slot, &err);
            return Err(err);
        }

        let checkout = CheckoutBranch {
            service: self.service.as_ref(),
        };
        match checkout.execute(&self.org, &self.app, branch_name).await {
            Ok(status) => {
                {
                    let mut state = self.state();
                    state.uncommitted_changes_error = None;
                    state.checkout_error = None;
                    state.current_branch = Some(
                        status
                            .current_branch
                            .clone()
                            .unwrap_or_else(|| branch_name.to_string()),
                    );
                }
                tracing::info!(branch = %branch_name, "branch_checked_out");
                self.reload.request_reload(ReloadReason::BranchCheckedOut {
                    branch: branch_name.to_string(),
                });
                Ok(status)
            }
            Err(BranchOperationError::UncommittedChanges(payload)) => {
                tracing::warn!(
                    branch = %branch_name,
                    files = payload.uncommitted_files.len(),
                    "checkout_blocked_by_uncommitted_changes"
                );
                self.state().uncommitted_changes_error = Some(payload.clone());
                Err(BranchOperationError::UncommittedChanges(payload))
            }
            Err(e) => {
                tracing::error!(branch = %branch_name, error = ?e, "checkout_branch_failed");
                self.record_failure(slot, &e);
                Err(e)
            }
        }
    }

    fn record_failure(&self, slot: ErrorSlot, err: &BranchOperationError) {
        let failure = Some(BranchFailure::from(err));
        let mut state = self.state();
        match slot {
            ErrorSlot::Create => state.create_error = failure,
            ErrorSlot::Checkout => state.checkout_error = failure,
        }
    }
}
