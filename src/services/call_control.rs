use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::domain::contact::Contact;
use crate::domain::errors::{StatusError, StatusResult};
use crate::domain::repositories::{ContactRepository, StatusStore};
use crate::domain::status::{AgentId, AgentStatus, CallInfo, StatusEvent};

/// Operations the request dispatcher invokes on behalf of an agent
///
/// Every call transition goes through the status store, so any long-poll on
/// the same agent is woken by it.
#[derive(Clone)]
pub struct CallControl {
    store: Arc<dyn StatusStore>,
    contacts: Arc<dyn ContactRepository>,
    long_poll_timeout: Duration,
}

impl CallControl {
    /// Creates a call-control service
    ///
    /// # Arguments
    /// * `store` - Shared status store
    /// * `contacts` - Directory used by `originate_by_contact` and searches
    /// * `long_poll_timeout` - Default bound for `agent_status`
    pub fn new(
        store: Arc<dyn StatusStore>,
        contacts: Arc<dyn ContactRepository>,
        long_poll_timeout: Duration,
    ) -> Self {
        Self {
            store,
            contacts,
            long_poll_timeout,
        }
    }

    /// Long-poll for an agent's status using the configured timeout
    ///
    /// # Returns
    /// * `Ok(AgentStatus)` - The current status if `known` is stale, otherwise the next one
    /// * `Err(StatusError::Timeout)` - If nothing changed in time
    pub async fn agent_status(
        &self,
        agent_id: AgentId,
        known: &AgentStatus,
    ) -> StatusResult<AgentStatus> {
        self.agent_status_with_timeout(agent_id, known, self.long_poll_timeout)
            .await
    }

    /// Long-poll for an agent's status with an explicit timeout
    pub async fn agent_status_with_timeout(
        &self,
        agent_id: AgentId,
        known: &AgentStatus,
        timeout: Duration,
    ) -> StatusResult<AgentStatus> {
        self.store.await_status_change(agent_id, known, timeout).await
    }

    /// Current status without waiting
    pub async fn current_status(&self, agent_id: AgentId) -> AgentStatus {
        self.store.get_status(agent_id).await
    }

    /// Start a call to a phone number
    pub async fn originate(&self, agent_id: AgentId, phone: &str) -> StatusResult<StatusEvent> {
        let call_info = CallInfo::start(None, phone);
        Ok(self.start_call(agent_id, call_info).await)
    }

    /// Start a call to a directory contact
    ///
    /// # Errors
    /// `StatusError::ContactNotFound` if the uuid is not in the directory
    pub async fn originate_by_contact(
        &self,
        agent_id: AgentId,
        contact_uuid: Uuid,
    ) -> StatusResult<StatusEvent> {
        let contact = self
            .contacts
            .find_by_uuid(contact_uuid)
            .await
            .ok_or(StatusError::ContactNotFound(contact_uuid))?;

        let call_info = CallInfo::start(Some(contact.name), contact.phone);
        Ok(self.start_call(agent_id, call_info).await)
    }

    /// Transfer the call elsewhere; the agent is no longer on it
    pub async fn redirect(&self, agent_id: AgentId, phone: &str) -> StatusResult<StatusEvent> {
        self.end_call(agent_id, Some(phone.to_string())).await
    }

    pub async fn hangup(&self, agent_id: AgentId) -> StatusResult<StatusEvent> {
        self.end_call(agent_id, None).await
    }

    /// Mute or unmute the active call
    ///
    /// # Errors
    /// `StatusError::NoActiveCall` if the agent is not on a call
    pub async fn set_mute(&self, agent_id: AgentId, is_mute: bool) -> StatusResult<StatusEvent> {
        self.store
            .update_status(
                agent_id,
                Box::new(move |current: &AgentStatus| -> StatusResult<AgentStatus> {
                    current.with_mute(agent_id, is_mute)
                }),
            )
            .await?;

        let event = StatusEvent::MuteChanged { agent_id, is_mute };
        tracing::info!(agent_id = %agent_id, is_mute, "Mute changed");
        Ok(event)
    }

    /// Put the active call on or off hold
    ///
    /// # Errors
    /// `StatusError::NoActiveCall` if the agent is not on a call
    pub async fn set_hold(&self, agent_id: AgentId, is_hold: bool) -> StatusResult<StatusEvent> {
        self.store
            .update_status(
                agent_id,
                Box::new(move |current: &AgentStatus| -> StatusResult<AgentStatus> {
                    current.with_hold(agent_id, is_hold)
                }),
            )
            .await?;

        let event = StatusEvent::HoldChanged { agent_id, is_hold };
        tracing::info!(agent_id = %agent_id, is_hold, "Hold changed");
        Ok(event)
    }

    /// Contacts whose name or phone starts with `prefix`
    pub async fn search_contacts(&self, prefix: &str, max_results: usize) -> Vec<Contact> {
        self.contacts.search(prefix, max_results).await
    }

    pub async fn recent_contacts(&self, max_results: usize) -> Vec<Contact> {
        self.contacts.recent(max_results).await
    }

    async fn start_call(&self, agent_id: AgentId, call_info: CallInfo) -> StatusEvent {
        let event = StatusEvent::CallStarted {
            agent_id,
            call_id: call_info.call_id.clone(),
            contact_phone: call_info.contact_phone.clone(),
        };

        self.store
            .set_status(agent_id, AgentStatus::in_conversation(call_info))
            .await;

        tracing::info!(agent_id = %agent_id, "Call started");
        event
    }

    async fn end_call(
        &self,
        agent_id: AgentId,
        redirected_to: Option<String>,
    ) -> StatusResult<StatusEvent> {
        self.store
            .set_status(agent_id, AgentStatus::not_in_conversation())
            .await;

        match &redirected_to {
            Some(target) => tracing::info!(agent_id = %agent_id, redirected_to = %target, "Call redirected"),
            None => tracing::info!(agent_id = %agent_id, "Call hung up"),
        }

        Ok(StatusEvent::CallEnded {
            agent_id,
            redirected_to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repositories::InMemoryContactRepository;
    use crate::infrastructure::store::InMemoryStatusStore;

    fn service() -> (CallControl, Contact) {
        let contact = Contact::new("Julie Jordan", "79990001122");
        let contacts = InMemoryContactRepository::new(vec![contact.clone()], 1);
        let control = CallControl::new(
            Arc::new(InMemoryStatusStore::new()),
            Arc::new(contacts),
            Duration::from_secs(10),
        );
        (control, contact)
    }

    #[tokio::test]
    async fn originate_records_call_without_contact_name() {
        let (control, _) = service();
        let agent = AgentId::new(1);

        let event = control.originate(agent, "5551234").await.unwrap();

        let status = control.current_status(agent).await;
        let info = status.call_info().unwrap();
        assert!(status.is_in_conversation());
        assert_eq!(info.contact_phone, "5551234");
        assert!(info.contact_name.is_none());
        assert_eq!(
            event,
            StatusEvent::CallStarted {
                agent_id: agent,
                call_id: info.call_id.clone(),
                contact_phone: "5551234".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn originate_by_contact_uses_directory_entry() {
        let (control, contact) = service();
        let agent = AgentId::new(2);

        control.originate_by_contact(agent, contact.uuid).await.unwrap();

        let status = control.current_status(agent).await;
        let info = status.call_info().unwrap();
        assert_eq!(info.contact_name.as_deref(), Some("Julie Jordan"));
        assert_eq!(info.contact_phone, "79990001122");
    }

    #[tokio::test]
    async fn originate_by_unknown_contact_fails() {
        let (control, _) = service();
        let missing = Uuid::new_v4();

        let err = control
            .originate_by_contact(AgentId::new(3), missing)
            .await
            .unwrap_err();

        assert!(matches!(err, StatusError::ContactNotFound(uuid) if uuid == missing));
        assert!(!control.current_status(AgentId::new(3)).await.is_in_conversation());
    }

    #[tokio::test]
    async fn mute_and_hold_modify_active_call() {
        let (control, _) = service();
        let agent = AgentId::new(4);
        control.originate(agent, "5551234").await.unwrap();
        let call_id = control.current_status(agent).await.call_info().unwrap().call_id.clone();

        control.set_mute(agent, true).await.unwrap();
        control.set_hold(agent, true).await.unwrap();

        let status = control.current_status(agent).await;
        let info = status.call_info().unwrap();
        assert!(info.is_mute);
        assert!(info.is_hold);
        assert_eq!(info.call_id, call_id);
    }

    #[tokio::test]
    async fn mute_without_call_is_rejected() {
        let (control, _) = service();
        let agent = AgentId::new(5);

        let err = control.set_mute(agent, true).await.unwrap_err();

        assert!(matches!(err, StatusError::NoActiveCall(id) if id == agent));
        assert_eq!(control.current_status(agent).await, AgentStatus::default());
    }

    #[tokio::test]
    async fn hold_without_call_is_rejected() {
        let (control, _) = service();

        let err = control.set_hold(AgentId::new(6), true).await.unwrap_err();

        assert!(matches!(err, StatusError::NoActiveCall(_)));
    }

    #[tokio::test]
    async fn hangup_and_redirect_clear_call() {
        let (control, _) = service();
        let agent = AgentId::new(7);

        control.originate(agent, "5551234").await.unwrap();
        let event = control.redirect(agent, "5550000").await.unwrap();
        assert_eq!(
            event,
            StatusEvent::CallEnded {
                agent_id: agent,
                redirected_to: Some("5550000".to_string()),
            }
        );
        assert_eq!(control.current_status(agent).await, AgentStatus::default());

        control.originate(agent, "5551234").await.unwrap();
        control.hangup(agent).await.unwrap();
        assert!(control.current_status(agent).await.call_info().is_none());
    }

    #[tokio::test]
    async fn contact_queries_delegate_to_directory() {
        let (control, contact) = service();

        assert_eq!(control.search_contacts("jul", 5).await, vec![contact.clone()]);
        assert!(control.search_contacts("zzz", 5).await.is_empty());
        assert_eq!(control.recent_contacts(5).await, vec![contact]);
    }
}
