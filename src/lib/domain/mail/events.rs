//! Send lifecycle notifications

use std::fmt;
use std::sync::Arc;

use super::message::Message;
use super::variables::VariableBag;

/// Event fired immediately before the transport call.
///
/// Subscribers may mutate the message; mutations are visible to subsequent
/// subscribers and to the transport.
#[derive(Debug)]
pub struct BeforeSendEvent<'a> {
    /// The composed message.
    pub message: &'a mut Message,

    /// Variables the message was composed with.
    pub variables: &'a VariableBag,
}

/// Informational event fired after the transport call returns.
///
/// Does not imply the transport reported success.
#[derive(Debug)]
pub struct AfterSendEvent<'a> {
    /// The message handed to the transport.
    pub message: &'a Message,

    /// Variables the message was composed with.
    pub variables: &'a VariableBag,
}

/// Subscriber to the send lifecycle.
///
/// Both methods have empty default bodies so implementations cover only the
/// notification they care about. Subscribers run synchronously on the
/// sending task, in registration order.
pub trait SendSubscriber: Send + Sync {
    /// Called before the transport call; may mutate the message.
    fn before_send(&self, _event: &mut BeforeSendEvent<'_>) {}

    /// Called after the transport call returned.
    fn after_send(&self, _event: &AfterSendEvent<'_>) {}
}

/// Ordered registry of lifecycle subscribers.
#[derive(Clone, Default)]
pub struct SendLifecycle {
    subscribers: Vec<Arc<dyn SendSubscriber>>,
}

impl fmt::Debug for SendLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendLifecycle")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl SendLifecycle {
    /// Create a registry with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a subscriber; subscribers are notified in registration order
    pub fn subscribe(&mut self, subscriber: Arc<dyn SendSubscriber>) {
        self.subscribers.push(subscriber);
    }

    /// Fire the before-send notification
    pub fn notify_before(&self, event: &mut BeforeSendEvent<'_>) {
        for subscriber in &self.subscribers {
            subscriber.before_send(event);
        }
    }

    /// Fire the after-send notification
    pub fn notify_after(&self, event: &AfterSendEvent<'_>) {
        for subscriber in &self.subscribers {
            subscriber.after_send(event);
        }
    }
}

/// Subscriber logging both notifications through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingSubscriber;

impl SendSubscriber for LoggingSubscriber {
    fn before_send(&self, event: &mut BeforeSendEvent<'_>) {
        tracing::debug!(
            template = %event.message.template,
            recipients = event.message.to.len(),
            "handing message to transport"
        );
    }

    fn after_send(&self, event: &AfterSendEvent<'_>) {
        tracing::info!(
            template = %event.message.template,
            subject = %event.message.subject,
            "message handed to transport"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use testresult::TestResult;

    use crate::domain::mail::value_objects::named_address::NamedAddress;

    use super::*;

    struct Recorder {
        tag: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl SendSubscriber for Recorder {
        fn before_send(&self, event: &mut BeforeSendEvent<'_>) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:before:{}", self.tag, event.message.to.len()));
        }

        fn after_send(&self, _event: &AfterSendEvent<'_>) {
            self.log.lock().unwrap().push(format!("{}:after", self.tag));
        }
    }

    struct AddRecipient;

    impl SendSubscriber for AddRecipient {
        fn before_send(&self, event: &mut BeforeSendEvent<'_>) {
            event
                .message
                .to(NamedAddress::new("audit@example.com", "Audit").unwrap());
        }
    }

    #[test]
    fn test_subscribers_run_in_registration_order() -> TestResult {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut lifecycle = SendLifecycle::new();
        lifecycle.subscribe(Arc::new(Recorder {
            tag: "first",
            log: log.clone(),
        }));
        lifecycle.subscribe(Arc::new(AddRecipient));
        lifecycle.subscribe(Arc::new(Recorder {
            tag: "second",
            log: log.clone(),
        }));

        let mut message = Message::new();
        let variables = VariableBag::new();
        lifecycle.notify_before(&mut BeforeSendEvent {
            message: &mut message,
            variables: &variables,
        });
        lifecycle.notify_after(&AfterSendEvent {
            message: &message,
            variables: &variables,
        });

        // the second recorder observes the recipient added in between
        assert_eq!(
            *log.lock().unwrap(),
            vec!["first:before:0", "second:before:1", "first:after", "second:after"]
        );
        assert_eq!(message.to.len(), 1);

        Ok(())
    }
}
