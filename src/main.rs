use std::sync::Arc;
use std::time::Duration;

use agent_status_core::config::Settings;
use agent_status_core::domain::contact::Contact;
use agent_status_core::domain::errors::StatusError;
use agent_status_core::domain::status::{AgentId, AgentStatus};
use agent_status_core::infrastructure::repositories::InMemoryContactRepository;
use agent_status_core::infrastructure::store::InMemoryStatusStore;
use agent_status_core::services::CallControl;

/// Long-poll an agent the way a widget would, logging every status it sees
async fn watch_agent(control: CallControl, agent_id: AgentId, polls: usize) {
    let mut known = AgentStatus::default();

    for _ in 0..polls {
        match control.agent_status(agent_id, &known).await {
            Ok(status) => {
                let body = serde_json::to_string(&status).unwrap_or_default();
                tracing::info!(agent_id = %agent_id, "Status update: {}", body);
                known = status;
            }
            Err(e) if e.is_timeout() => {
                tracing::info!(agent_id = %agent_id, "Long poll timed out, polling again");
            }
            Err(e) => {
                tracing::error!(agent_id = %agent_id, "Long poll failed: {}", e);
                return;
            }
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let settings = Settings::from_env();
    tracing::info!(
        "Long poll timeout {:?}, demo agent {}",
        settings.long_poll_timeout,
        settings.demo_agent_id
    );

    let contacts = vec![
        Contact::new("Harry Williams", "71234567890"),
        Contact::new("Rose Peters", "81234567890"),
        Contact::new("Julie Jordan", "79990001122"),
    ];
    let first_contact = contacts[0].uuid;

    let store = Arc::new(InMemoryStatusStore::new());
    let control = CallControl::new(
        store.clone(),
        Arc::new(InMemoryContactRepository::new(contacts, 2)),
        settings.long_poll_timeout,
    );

    let agent_id = settings.demo_agent_id;
    let watcher = tokio::spawn(watch_agent(control.clone(), agent_id, 6));

    // Scripted call session driving the watcher
    let pause = Duration::from_millis(200);
    let steps = async {
        tokio::time::sleep(pause).await;
        control.originate_by_contact(agent_id, first_contact).await?;
        tokio::time::sleep(pause).await;
        control.set_mute(agent_id, true).await?;
        tokio::time::sleep(pause).await;
        control.set_hold(agent_id, true).await?;
        tokio::time::sleep(pause).await;
        control.redirect(agent_id, "5550000").await?;
        tokio::time::sleep(pause).await;
        control.originate(agent_id, "5551234").await?;
        tokio::time::sleep(pause).await;
        control.hangup(agent_id).await?;
        Ok::<(), StatusError>(())
    };

    if let Err(e) = steps.await {
        tracing::error!("Call session failed: {}", e);
    }

    if let Err(e) = control.set_mute(agent_id, false).await {
        tracing::warn!("Rejected as expected: {}", e);
    }

    if watcher.await.is_err() {
        tracing::error!("Watcher task panicked");
    }

    tracing::info!(
        "Done: {} known agents, {} waiters left",
        store.known_agents(),
        store.pending_waiters(agent_id)
    );
}
