//! Bulk mark-as-read

use crate::error::SyncError;

use super::super::{Effect, InboxState};

impl InboxState {
    pub(crate) fn mark_selected_read(&mut self) -> Result<Vec<Effect>, SyncError> {
        if self.bulk_pending {
            return Err(SyncError::validation("A bulk action is already in progress"));
        }
        if self.selection.bulk.is_empty() {
            return Err(SyncError::validation("Please select at least one email"));
        }

        let ids: Vec<_> = self.selection.bulk.iter().cloned().collect();
        tracing::info!("Marking {} messages as read", ids.len());
        self.bulk_pending = true;
        Ok(vec![Effect::MarkReadBulk(ids)])
    }
}

#[cfg(test)]
mod tests {
    use crate::app::testing::*;
    use crate::app::{Completion, Effect, Intent};
    use crate::error::SyncError;
    use crate::mail::types::make_message;

    fn with_checked(ids: &[&str]) -> crate::app::InboxState {
        let mut state = state();
        let list = ids.iter().map(|i| make_message(i, false)).collect();
        loaded(&mut state, "a@example.com", ids.len() as u64, list);
        for i in ids {
            state.handle_intent(Intent::ToggleBulk(id(i))).unwrap();
        }
        state
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        let mut state = state();
        loaded(&mut state, "a@example.com", 0, vec![]);

        assert_eq!(
            state.handle_intent(Intent::MarkSelectedRead),
            Err(SyncError::validation("Please select at least one email"))
        );
        assert!(!state.view().bulk_pending);
    }

    #[test]
    fn test_bulk_request_carries_checked_ids() {
        let mut state = with_checked(&["b", "a"]);

        let effects = state.handle_intent(Intent::MarkSelectedRead).unwrap();
        assert_eq!(effects, vec![Effect::MarkReadBulk(vec![id("a"), id("b")])]);
        assert!(state.view().bulk_pending);
    }

    #[test]
    fn test_second_bulk_rejected_while_pending() {
        let mut state = with_checked(&["a"]);
        state.handle_intent(Intent::MarkSelectedRead).unwrap();

        let err = state.handle_intent(Intent::MarkSelectedRead).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_bulk_success_clears_submitted_ids_and_revalidates() {
        let mut state = with_checked(&["a", "b"]);
        let effects = state.handle_intent(Intent::MarkSelectedRead).unwrap();
        let Effect::MarkReadBulk(ids) = effects[0].clone() else {
            panic!("expected bulk effect");
        };
        // Checked while the request was in flight.
        state.handle_intent(Intent::ToggleBulk(id("c"))).unwrap();

        let effects = state
            .handle_completion(Completion::BulkMarkRead {
                ids,
                result: Ok(()),
            })
            .unwrap();

        let view = state.view();
        assert!(!view.bulk_pending);
        assert_eq!(view.bulk_selected, vec![id("c")]);
        assert!(single_ticket(&effects).revalidate);
    }

    #[test]
    fn test_bulk_failure_keeps_selection() {
        let mut state = with_checked(&["a", "b"]);
        let effects = state.handle_intent(Intent::MarkSelectedRead).unwrap();
        let Effect::MarkReadBulk(ids) = effects[0].clone() else {
            panic!("expected bulk effect");
        };

        let err = state
            .handle_completion(Completion::BulkMarkRead {
                ids,
                result: Err(SyncError::Server(String::new())),
            })
            .unwrap_err();

        assert_eq!(err, SyncError::Server("Failed to mark emails as read".into()));
        let view = state.view();
        assert!(!view.bulk_pending);
        assert_eq!(view.bulk_selected, vec![id("a"), id("b")]);
    }

    #[test]
    fn test_bulk_failure_keeps_server_message() {
        let mut state = with_checked(&["a"]);
        state.handle_intent(Intent::MarkSelectedRead).unwrap();

        let err = state
            .handle_completion(Completion::BulkMarkRead {
                ids: vec![id("a")],
                result: Err(SyncError::Server("quota exceeded".into())),
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "quota exceeded");
    }
}
