//! Listing results and poll ticks

use std::sync::Arc;

use crate::error::SyncError;
use crate::mail::types::PageResult;

use super::super::{Effect, FetchTicket, FetchedPage, InboxState};

impl InboxState {
    pub(crate) fn handle_page_loaded(
        &mut self,
        ticket: FetchTicket,
        result: Result<Arc<FetchedPage>, SyncError>,
    ) -> Result<Vec<Effect>, SyncError> {
        if self.is_stale(&ticket) {
            tracing::debug!("Discarding stale listing for {} (seq {})", ticket.key, ticket.seq);
            return Ok(Vec::new());
        }
        self.settle(ticket.seq);

        match result {
            Ok(fetched) if self.is_superseded(fetched.origin_seq) => {
                tracing::debug!(
                    "Discarding listing for {} loaded by seq {}; a newer one is shown",
                    ticket.key,
                    fetched.origin_seq
                );
                Ok(Vec::new())
            }
            Ok(fetched) => {
                self.mark_applied(fetched.origin_seq);
                let mut page = fetched.page.clone();
                self.overlay_optimistic(&mut page, fetched.origin_seq);
                self.selection.reconcile(&page);
                tracing::debug!(
                    "Applied {} messages of {} for {}",
                    page.list.len(),
                    page.total,
                    ticket.key
                );
                self.page = Some(page);
                self.status.clear_error();
                Ok(Vec::new())
            }
            Err(e) if self.is_superseded(ticket.seq) => {
                tracing::debug!("Ignoring failure of superseded listing {}: {}", ticket.key, e);
                Ok(Vec::new())
            }
            Err(e) => {
                tracing::warn!("Listing {} failed: {}", ticket.key, e);
                Err(e)
            }
        }
    }

    /// Keep locally marked messages read until the server has caught up.
    ///
    /// A listing loaded after the mark-read was acknowledged is authoritative and retires
    /// the entry, whatever it says. Earlier loads, including ones handed out later from the
    /// dedup window, only retire it once they report the message read themselves.
    fn overlay_optimistic(&mut self, page: &mut PageResult, origin_seq: u64) {
        self.optimistic.retain(|id, entry| {
            if entry.confirmed_from_seq.is_some_and(|from| origin_seq >= from) {
                return false;
            }
            match page.get_mut(id) {
                Some(message) if message.is_read() => false,
                Some(message) => {
                    message.read_at = Some(entry.read_at);
                    true
                }
                None => true,
            }
        });
    }

    pub(crate) fn handle_poll_tick(&mut self, generation: u64) -> Vec<Effect> {
        if generation != self.poll_generation || !self.refresh.auto_refresh {
            tracing::debug!("Ignoring tick from retired poller {}", generation);
            return Vec::new();
        }
        self.fetch_active(false)
    }
}

#[cfg(test)]
mod tests {
    use crate::app::testing::*;
    use crate::app::{Completion, Effect, Intent};
    use crate::error::SyncError;
    use crate::mail::types::make_message;

    #[test]
    fn test_stale_key_result_never_mutates_view() {
        let mut state = state();
        loaded(
            &mut state,
            "a@example.com",
            3,
            vec![make_message("a1", true), make_message("a2", true)],
        );
        state
            .handle_intent(Intent::SelectMessage(Some(id("a1"))))
            .unwrap();
        let page_one = single_ticket(&state.handle_intent(Intent::Refresh).unwrap());

        let page_two = single_ticket(&state.handle_intent(Intent::SetPage(2)).unwrap());
        state
            .handle_completion(delivered(page_two, 3, vec![make_message("a3", true)]))
            .unwrap();

        // The page 1 listing lands after page 2 became active.
        let effects = state
            .handle_completion(delivered(page_one, 99, vec![make_message("zz", false)]))
            .unwrap();

        assert!(effects.is_empty());
        let view = state.view();
        assert_eq!(view.total, Some(3));
        assert_eq!(view.messages[0].id, id("a3"));
    }

    #[test]
    fn test_result_for_previous_mailbox_is_discarded() {
        let mut state = state();
        let first = single_ticket(
            &state
                .handle_intent(Intent::SelectMailbox(Some(mailbox("a@example.com"))))
                .unwrap(),
        );
        let second = single_ticket(
            &state
                .handle_intent(Intent::SelectMailbox(Some(mailbox("b@example.com"))))
                .unwrap(),
        );

        state
            .handle_completion(delivered(second, 1, vec![make_message("b1", false)]))
            .unwrap();
        state
            .handle_completion(delivered(first, 7, vec![make_message("a1", false)]))
            .unwrap();

        let view = state.view();
        assert_eq!(view.total, Some(1));
        assert_eq!(view.messages[0].id, id("b1"));
    }

    #[test]
    fn test_round_trip_to_same_key_drops_earlier_requests() {
        let mut state = state();
        loaded(&mut state, "a@example.com", 30, vec![]);
        let old = single_ticket(&state.handle_intent(Intent::Refresh).unwrap());

        state.handle_intent(Intent::SetPage(2)).unwrap();
        let current = single_ticket(&state.handle_intent(Intent::SetPage(1)).unwrap());
        assert_eq!(old.key, current.key);

        state
            .handle_completion(delivered(old, 5, vec![make_message("old", false)]))
            .unwrap();
        assert_eq!(state.view().total, None);
        assert!(state.view().loading);
    }

    #[test]
    fn test_older_result_for_active_key_does_not_overwrite_newer() {
        let mut state = state();
        loaded(&mut state, "a@example.com", 1, vec![make_message("m1", false)]);
        let older = single_ticket(&state.handle_intent(Intent::Refresh).unwrap());
        let newer = single_ticket(&state.handle_intent(Intent::Refresh).unwrap());

        state
            .handle_completion(delivered(
                newer,
                2,
                vec![make_message("m2", false), make_message("m1", false)],
            ))
            .unwrap();
        state
            .handle_completion(delivered(older, 1, vec![make_message("m1", false)]))
            .unwrap();

        assert_eq!(state.view().total, Some(2));
        assert!(!state.view().loading);
    }

    #[test]
    fn test_listing_failure_keeps_previous_page() {
        let mut state = state();
        loaded(&mut state, "a@example.com", 1, vec![make_message("m1", false)]);
        let ticket = single_ticket(&state.handle_intent(Intent::Refresh).unwrap());

        let err = state
            .handle_completion(Completion::PageLoaded {
                ticket,
                result: Err(SyncError::Server("boom".into())),
            })
            .unwrap_err();

        assert_eq!(err.to_string(), "boom");
        let view = state.view();
        assert_eq!(view.messages.len(), 1);
        assert!(!view.loading);
    }

    #[test]
    fn test_error_cleared_by_next_successful_listing() {
        let mut state = state();
        loaded(&mut state, "a@example.com", 0, vec![]);
        state.status_mut().set_error("Network error: down");

        let ticket = single_ticket(&state.handle_intent(Intent::Refresh).unwrap());
        state
            .handle_completion(delivered(ticket, 0, vec![]))
            .unwrap();
        assert_eq!(state.view().error, None);
    }

    #[test]
    fn test_optimistic_read_survives_listing_issued_before_ack() {
        let mut state = state();
        loaded(&mut state, "a@example.com", 1, vec![make_message("m1", false)]);
        let in_flight = single_ticket(&state.handle_intent(Intent::Refresh).unwrap());

        state
            .handle_intent(Intent::SelectMessage(Some(id("m1"))))
            .unwrap();
        let local_read_at = state.view().messages[0].read_at;

        state
            .handle_completion(delivered(in_flight, 1, vec![make_message("m1", false)]))
            .unwrap();

        let view = state.view();
        assert!(view.messages[0].is_read());
        assert_eq!(view.messages[0].read_at, local_read_at);
    }

    #[test]
    fn test_listing_before_ack_still_protected_after_ack_arrives() {
        let mut state = state();
        loaded(&mut state, "a@example.com", 1, vec![make_message("m1", false)]);
        state
            .handle_intent(Intent::SelectMessage(Some(id("m1"))))
            .unwrap();
        let before_ack = single_ticket(&state.handle_intent(Intent::Refresh).unwrap());

        let effects = state
            .handle_completion(Completion::MarkRead {
                id: id("m1"),
                result: Ok(()),
            })
            .unwrap();
        let after_ack = single_ticket(&effects);
        assert!(after_ack.revalidate);

        state
            .handle_completion(delivered(before_ack, 1, vec![make_message("m1", false)]))
            .unwrap();
        assert!(state.view().messages[0].is_read());

        state
            .handle_completion(delivered(after_ack, 1, vec![make_message("m1", true)]))
            .unwrap();
        assert!(state.view().messages[0].is_read());
        assert!(state.optimistic.is_empty());
    }

    #[test]
    fn test_listing_after_ack_is_authoritative() {
        let mut state = state();
        loaded(&mut state, "a@example.com", 1, vec![make_message("m1", false)]);
        state.handle_intent(Intent::MarkRead(id("m1"))).unwrap();
        let after_ack = single_ticket(
            &state
                .handle_completion(Completion::MarkRead {
                    id: id("m1"),
                    result: Ok(()),
                })
                .unwrap(),
        );

        // Marked unread elsewhere in the meantime.
        state
            .handle_completion(delivered(after_ack, 1, vec![make_message("m1", false)]))
            .unwrap();
        assert!(!state.view().messages[0].is_read());
    }

    #[test]
    fn test_cached_listing_after_ack_does_not_hide_fresh_one() {
        let mut state = state();
        let first = single_ticket(
            &state
                .handle_intent(Intent::SelectMailbox(Some(mailbox("a@example.com"))))
                .unwrap(),
        );
        state
            .handle_completion(delivered(first.clone(), 1, vec![make_message("m1", false)]))
            .unwrap();
        state
            .handle_intent(Intent::SelectMessage(Some(id("m1"))))
            .unwrap();
        let resync = single_ticket(
            &state
                .handle_completion(Completion::MarkRead {
                    id: id("m1"),
                    result: Ok(()),
                })
                .unwrap(),
        );
        let refresh = single_ticket(&state.handle_intent(Intent::Refresh).unwrap());
        assert!(refresh.seq > resync.seq);

        // The refresh is answered from the first load before the resync returns.
        state
            .handle_completion(served(
                refresh,
                first.seq,
                1,
                vec![make_message("m1", false)],
            ))
            .unwrap();
        assert!(state.view().messages[0].is_read());

        state
            .handle_completion(delivered(resync, 1, vec![make_message("m1", true)]))
            .unwrap();
        assert!(state.view().messages[0].is_read());
        assert!(state.optimistic.is_empty());
    }

    #[test]
    fn test_listing_loaded_before_shown_one_is_discarded() {
        let mut state = state();
        loaded(&mut state, "a@example.com", 1, vec![make_message("m1", false)]);
        let early = single_ticket(&state.handle_intent(Intent::Refresh).unwrap());
        let late = single_ticket(&state.handle_intent(Intent::Refresh).unwrap());
        state
            .handle_completion(delivered(late, 1, vec![make_message("m1", true)]))
            .unwrap();

        // A poll inside the window gets the early load, which reached the cache last.
        let tick = single_ticket(&state.handle_intent(Intent::Refresh).unwrap());
        state
            .handle_completion(served(tick, early.seq, 1, vec![make_message("m1", false)]))
            .unwrap();

        let view = state.view();
        assert!(view.messages[0].is_read());
        assert!(!view.loading);
    }

    #[test]
    fn test_server_read_flag_retires_overlay() {
        let mut state = state();
        loaded(&mut state, "a@example.com", 1, vec![make_message("m1", false)]);
        state.handle_intent(Intent::MarkRead(id("m1"))).unwrap();

        let ticket = single_ticket(&state.handle_intent(Intent::Refresh).unwrap());
        state
            .handle_completion(delivered(ticket, 1, vec![make_message("m1", true)]))
            .unwrap();

        assert!(state.optimistic.is_empty());
        assert_eq!(
            state.view().messages[0].read_at,
            make_message("m1", true).read_at
        );
    }

    #[test]
    fn test_poll_tick_fetches_active_page() {
        let mut state = state();
        loaded(&mut state, "a@example.com", 0, vec![]);
        let effects = state.handle_intent(Intent::SetAutoRefresh(true)).unwrap();
        let Effect::StartPolling { generation, .. } = effects[0] else {
            panic!("expected polling to start");
        };

        let effects = state
            .handle_completion(Completion::PollTick { generation })
            .unwrap();
        let ticket = single_ticket(&effects);
        assert!(!ticket.revalidate);
    }

    #[test]
    fn test_tick_from_retired_poller_is_ignored() {
        let mut state = state();
        loaded(&mut state, "a@example.com", 0, vec![]);
        let effects = state.handle_intent(Intent::SetAutoRefresh(true)).unwrap();
        let Effect::StartPolling { generation, .. } = effects[0] else {
            panic!("expected polling to start");
        };

        state
            .handle_intent(Intent::SelectMailbox(Some(mailbox("b@example.com"))))
            .unwrap();
        assert!(
            state
                .handle_completion(Completion::PollTick { generation })
                .unwrap()
                .is_empty()
        );

        state.handle_intent(Intent::SetAutoRefresh(false)).unwrap();
        let current = state.poll_generation;
        assert!(
            state
                .handle_completion(Completion::PollTick {
                    generation: current
                })
                .unwrap()
                .is_empty()
        );
    }
}
