use crate::agent::tools::ordering_tools;
use crate::agent::Agent;
use crate::config::AgentConfig;
use crate::desk::OrderDesk;
use crate::error::Error;
use crate::events::Event;
use crate::instructions::agent_instructions;
use crate::llm::ChatModel;
use crate::menu::MenuSource;
use crate::order::OrderedItem;
use crate::receipt::{Receipt, ReceiptWriter};
use crate::runtime::{LocalRuntime, Runtime};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub receipt_path: PathBuf,
    pub max_tool_steps: usize,
}

impl From<&AgentConfig> for SessionSettings {
    fn from(config: &AgentConfig) -> Self {
        Self {
            receipt_path: config.receipt_path.clone(),
            max_tool_steps: config.max_tool_steps,
        }
    }
}

/// What happened in a session, produced when it ends.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub events: Vec<Event>,
    pub order: Vec<OrderedItem>,
    pub receipt: Receipt,
}

/// One car at the speaker: an agent, its conversation so far, and the order being built.
pub struct DriveThruSession {
    pub id: String,
    pub started_at: DateTime<Utc>,
    agent: Agent,
    history: RwLock<Vec<Event>>,
    runtime: Box<dyn Runtime>,
    desk: Arc<OrderDesk>,
    turn: Mutex<()>,
}

impl DriveThruSession {
    /// Loads the menu, clears the receipt file and builds the agent with the full instructions.
    pub async fn start(
        id: String,
        llm: Arc<dyn ChatModel>,
        menu_source: &dyn MenuSource,
        settings: &SessionSettings,
    ) -> Result<Self, Error> {
        let menu = menu_source.load_menu().await;
        let desk = Arc::new(OrderDesk::new(
            menu,
            ReceiptWriter::new(settings.receipt_path.clone()),
        ));
        desk.reset().await?;

        let agent = Agent::new(llm, agent_instructions(desk.menu()))
            .with_max_tool_steps(settings.max_tool_steps);
        let runtime = LocalRuntime::new(ordering_tools(desk.clone()));

        tracing::info!("Session {} started, receipt at {}", id, settings.receipt_path.display());

        Ok(Self {
            id,
            started_at: Utc::now(),
            agent,
            history: RwLock::new(Vec::new()),
            runtime: Box::new(runtime),
            desk,
            turn: Mutex::new(()),
        })
    }

    pub fn desk(&self) -> &Arc<OrderDesk> {
        &self.desk
    }

    pub async fn history(&self) -> Vec<Event> {
        self.history.read().await.clone()
    }

    /// Feeds one customer utterance to the agent and returns its spoken reply.
    ///
    /// Turns are serialized; a second caller waits for the first turn to finish.
    /// A turn that fails after running tools still leaves their events in history.
    pub async fn handle_turn(&self, text: &str) -> Result<String, Error> {
        let _turn = self.turn.lock().await;

        let snapshot = {
            let mut history = self.history.write().await;
            history.push(Event::user(text));
            history.clone()
        };

        match self.agent.step(&snapshot, self.runtime.as_ref()).await {
            Ok(events) => {
                let reply = match events.last() {
                    Some(Event::Message(m)) => m.content.clone(),
                    _ => String::new(),
                };
                self.history.write().await.extend(events);
                Ok(reply)
            }
            // Tools already changed the order; keep their events so the report explains it.
            Err(Error::IncompleteTurn { events, source }) => {
                tracing::warn!("Turn in session {} ended early: {}", self.id, source);
                self.history.write().await.extend(events);
                Err(*source)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn report(&self) -> SessionReport {
        SessionReport {
            session_id: self.id.clone(),
            started_at: self.started_at,
            ended_at: Utc::now(),
            events: self.history().await,
            order: self.desk.list_order_items().await,
            receipt: self.desk.receipt().await,
        }
    }
}

/// Receipt file for one of many concurrent sessions: `receipt.json` becomes
/// `receipt-<id>.json` next to it.
pub fn session_receipt_path(base: &Path, session_id: &str) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "receipt".to_string());
    let ext = base
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| "json".to_string());
    base.with_file_name(format!("{}-{}.{}", stem, session_id, ext))
}

pub struct SessionManager {
    llm: Arc<dyn ChatModel>,
    menu_source: Arc<dyn MenuSource>,
    settings: SessionSettings,
    sessions: RwLock<HashMap<String, Arc<DriveThruSession>>>,
}

impl SessionManager {
    pub fn new(
        llm: Arc<dyn ChatModel>,
        menu_source: Arc<dyn MenuSource>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            llm,
            menu_source,
            settings,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn create_session(&self) -> Result<Arc<DriveThruSession>, Error> {
        let id = Uuid::new_v4().to_string();
        let settings = SessionSettings {
            receipt_path: session_receipt_path(&self.settings.receipt_path, &id),
            max_tool_steps: self.settings.max_tool_steps,
        };

        let session = Arc::new(
            DriveThruSession::start(id.clone(), self.llm.clone(), self.menu_source.as_ref(), &settings)
                .await?,
        );
        self.sessions.write().await.insert(id, session.clone());
        Ok(session)
    }

    pub async fn get_session(&self, id: &str) -> Option<Arc<DriveThruSession>> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Removes the session and returns its final report.
    pub async fn end_session(&self, id: &str) -> Result<SessionReport, Error> {
        let session = self
            .sessions
            .write()
            .await
            .remove(id)
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
        let report = session.report().await;
        tracing::info!(
            "Session {} ended with {} item(s), total {:.2}",
            id,
            report.order.len(),
            report.receipt.total_price
        );
        Ok(report)
    }
}
