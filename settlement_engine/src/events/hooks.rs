use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{EventHandler, EventProducer, Handler, HostTransferFailedEvent, SettlementCompletedEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub settlement_completed_producer: Vec<EventProducer<SettlementCompletedEvent>>,
    pub host_transfer_failed_producer: Vec<EventProducer<HostTransferFailedEvent>>,
}

pub struct EventHandlers {
    pub on_settlement_completed: Option<EventHandler<SettlementCompletedEvent>>,
    pub on_host_transfer_failed: Option<EventHandler<HostTransferFailedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_settlement_completed = hooks.on_settlement_completed.map(|f| EventHandler::new(buffer_size, f));
        let on_host_transfer_failed = hooks.on_host_transfer_failed.map(|f| EventHandler::new(buffer_size, f));
        Self { on_settlement_completed, on_host_transfer_failed }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_settlement_completed {
            result.settlement_completed_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_host_transfer_failed {
            result.host_transfer_failed_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_settlement_completed {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_host_transfer_failed {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_settlement_completed: Option<Handler<SettlementCompletedEvent>>,
    pub on_host_transfer_failed: Option<Handler<HostTransferFailedEvent>>,
}

impl EventHooks {
    pub fn on_settlement_completed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(SettlementCompletedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_settlement_completed = Some(Arc::new(f));
        self
    }

    pub fn on_host_transfer_failed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(HostTransferFailedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_host_transfer_failed = Some(Arc::new(f));
        self
    }
}
