use std::time::Duration;

use log::{debug, error, info};
use serde_json::Value;
use tokio::sync::watch;
use tokio::time::sleep;

use crate::error::WatchError;
use crate::practicum::api::PracticumInterface;
use crate::practicum::status::{check_response, parse_status};
use crate::telegram::BotClient;

/// Recorded when the homework list comes back empty.
pub const NO_NEW_STATUSES: &str = "Новые статусы не поступили";

/// Prefix for error reports relayed to the chat.
pub const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// Change-detection state threaded through successive poll cycles.
/// Starts empty on every process launch - nothing is persisted.
pub struct Watcher {
    pub(crate) cursor: i64,
    pub(crate) last_emitted: String,
}

impl Watcher {
    pub fn new(cursor: i64) -> Watcher {
        Watcher {
            cursor,
            last_emitted: String::new(),
        }
    }

    /// Folds one poll outcome into the state and decides whether to notify.
    ///
    /// # Behavior
    /// - A fresh verdict is returned for delivery only when it differs from
    ///   the previous cycle's record.
    /// - An empty homework list records the idle marker silently.
    /// - Any error becomes a `FAILURE_PREFIX` report, suppressed for as long
    ///   as the same report repeats, so a persistent fault produces one
    ///   notification instead of a storm.
    /// - The last-emitted record is overwritten on every cycle, whether or
    ///   not anything was sent.
    pub fn evaluate(&mut self, outcome: Result<Value, WatchError>) -> Option<String> {
        match outcome.and_then(|payload| self.digest(&payload)) {
            Ok(Some(message)) => {
                let changed = message != self.last_emitted;
                self.last_emitted = message.clone();
                if changed {
                    Some(message)
                } else {
                    debug!("Status unchanged, suppressing");
                    None
                }
            }
            Ok(None) => {
                debug!("No new homework statuses upstream");
                self.last_emitted = NO_NEW_STATUSES.to_string();
                None
            }
            Err(err) => {
                let message = format!("{FAILURE_PREFIX}: {err}");
                error!("{message}");
                let changed = message != self.last_emitted;
                self.last_emitted = message.clone();
                changed.then_some(message)
            }
        }
    }

    /// Validates the payload, extracts the newest verdict and advances the
    /// cursor. The upstream list is newest-first, so only element 0 matters.
    ///
    /// The cursor moves only after validation and extraction succeeded, and
    /// only when the server supplied an integer `current_date` - a failed
    /// cycle re-fetches the same window.
    fn digest(&mut self, payload: &Value) -> Result<Option<String>, WatchError> {
        let homeworks = check_response(payload)?;

        let message = match homeworks.first() {
            Some(record) => Some(parse_status(record)?),
            None => None,
        };

        if let Some(current_date) = payload.get("current_date").and_then(Value::as_i64) {
            self.cursor = current_date;
        }

        Ok(message)
    }
}

/// Polling worker: fetch -> evaluate -> deliver -> sleep, forever.
///
/// The sleep doubles as the cancellation point: the loop leaves when the
/// stop channel flips (or its sender is dropped). There is no other
/// terminal condition.
pub async fn poll_worker(
    mut watcher: Watcher,
    api: &PracticumInterface,
    bot: &BotClient,
    period: Duration,
    mut stop: watch::Receiver<bool>,
) {
    loop {
        let outcome = api.request(watcher.cursor).await;
        if let Some(message) = watcher.evaluate(outcome) {
            bot.send(&message).await;
        }

        tokio::select! {
            _ = stop.changed() => {
                info!("Stop requested, leaving poll worker");
                return;
            }
            _ = sleep(period) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn approved_payload() -> Result<Value, WatchError> {
        Ok(json!({
            "homeworks": [{"homework_name": "hw1", "status": "approved"}],
            "current_date": 1000
        }))
    }

    #[test]
    fn fresh_status_notifies_and_advances_cursor() {
        let mut watcher = Watcher::new(0);
        let message = watcher.evaluate(approved_payload()).unwrap();
        assert_eq!(
            message,
            "Изменился статус проверки работы \"hw1\". \
             Работа проверена: ревьюеру всё понравилось. Ура!"
        );
        assert_eq!(watcher.cursor, 1000);
    }

    #[test]
    fn repeated_status_notifies_exactly_once() {
        let mut watcher = Watcher::new(0);
        assert!(watcher.evaluate(approved_payload()).is_some());
        assert!(watcher.evaluate(approved_payload()).is_none());
    }

    #[test]
    fn status_transition_notifies_again() {
        let mut watcher = Watcher::new(0);
        assert!(watcher.evaluate(approved_payload()).is_some());

        let rejected = json!({
            "homeworks": [{"homework_name": "hw1", "status": "rejected"}]
        });
        let message = watcher.evaluate(Ok(rejected)).unwrap();
        assert!(message.contains("Работа проверена: у ревьюера есть замечания."));
    }

    #[test]
    fn empty_list_records_idle_marker_without_notifying() {
        let mut watcher = Watcher::new(42);
        assert!(watcher.evaluate(Ok(json!({"homeworks": []}))).is_none());
        assert_eq!(watcher.last_emitted, NO_NEW_STATUSES);
        // No current_date in the payload, so the cursor holds.
        assert_eq!(watcher.cursor, 42);
    }

    #[test]
    fn status_after_idle_notifies() {
        let mut watcher = Watcher::new(0);
        assert!(watcher.evaluate(Ok(json!({"homeworks": []}))).is_none());
        assert!(watcher.evaluate(approved_payload()).is_some());
    }

    #[test]
    fn bogus_status_relays_one_error_report() {
        let mut watcher = Watcher::new(0);
        let payload = json!({"homeworks": [{"homework_name": "hw2", "status": "bogus"}]});
        let message = watcher.evaluate(Ok(payload)).unwrap();
        assert!(message.starts_with(FAILURE_PREFIX));
    }

    #[test]
    fn payload_without_homeworks_relays_one_error_report() {
        let mut watcher = Watcher::new(0);
        let message = watcher.evaluate(Ok(json!({}))).unwrap();
        assert!(message.starts_with(FAILURE_PREFIX));
    }

    #[test]
    fn identical_errors_notify_exactly_once() {
        let mut watcher = Watcher::new(0);
        assert!(watcher.evaluate(Ok(json!({}))).is_some());
        assert!(watcher.evaluate(Ok(json!({}))).is_none());
    }

    #[test]
    fn distinct_errors_both_notify() {
        let mut watcher = Watcher::new(0);
        assert!(watcher.evaluate(Ok(json!({}))).is_some());
        assert!(watcher.evaluate(Ok(json!([]))).is_some());
    }

    #[test]
    fn recovery_after_error_notifies() {
        let mut watcher = Watcher::new(0);
        assert!(watcher.evaluate(Ok(json!({}))).is_some());
        assert!(watcher.evaluate(approved_payload()).is_some());
    }

    #[test]
    fn cursor_holds_when_extraction_fails() {
        let mut watcher = Watcher::new(7);
        let payload = json!({
            "homeworks": [{"homework_name": "hw", "status": "bogus"}],
            "current_date": 555
        });
        let _ = watcher.evaluate(Ok(payload));
        assert_eq!(watcher.cursor, 7);
    }

    #[test]
    fn non_integer_current_date_is_ignored() {
        let mut watcher = Watcher::new(7);
        let payload = json!({"homeworks": [], "current_date": "soon"});
        let _ = watcher.evaluate(Ok(payload));
        assert_eq!(watcher.cursor, 7);
    }
}
