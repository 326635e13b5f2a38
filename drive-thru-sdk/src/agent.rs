pub mod tools;

use crate::error::Error;
use crate::events::{ActionEvent, Event, ObservationEvent, SOURCE_AGENT, SOURCE_USER};
use crate::llm::ChatModel;
use crate::runtime::Runtime;
use chrono::Utc;
use genai::chat::{ChatMessage, ChatRole, ContentPart, ToolCall, ToolResponse};
use std::sync::Arc;

pub const DEFAULT_MAX_TOOL_STEPS: usize = 10;

pub struct Agent {
    llm: Arc<dyn ChatModel>,
    instructions: String,
    max_tool_steps: usize,
}

impl Agent {
    pub fn new(llm: Arc<dyn ChatModel>, instructions: String) -> Self {
        Self {
            llm,
            instructions,
            max_tool_steps: DEFAULT_MAX_TOOL_STEPS,
        }
    }

    pub fn with_max_tool_steps(mut self, max_tool_steps: usize) -> Self {
        self.max_tool_steps = max_tool_steps;
        self
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    fn history_messages(&self, history: &[Event]) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(self.instructions.clone())];

        for event in history {
            match event {
                Event::Message(m) => {
                    if m.source == SOURCE_USER {
                        messages.push(ChatMessage::user(m.content.clone()));
                    } else {
                        messages.push(ChatMessage::assistant(m.content.clone()));
                    }
                }
                Event::Action(a) => {
                    let mut parts = vec![];
                    if let Some(thought) = &a.thought {
                        parts.push(ContentPart::Text(thought.clone()));
                    }
                    parts.push(ContentPart::ToolCall(ToolCall {
                        call_id: a.tool_call_id.clone(),
                        fn_name: a.tool_name.clone(),
                        fn_arguments: a.arguments.clone(),
                    }));
                    messages.push(ChatMessage {
                        role: ChatRole::Assistant,
                        content: parts.into(),
                        options: None,
                    });
                }
                Event::Observation(o) => {
                    messages.push(ChatMessage::from(ToolResponse::new(
                        o.tool_call_id.clone(),
                        o.content.clone(),
                    )));
                }
            }
        }

        messages
    }

    /// Runs one customer turn: calls the model, executes any tool calls it
    /// makes, and repeats until it answers in plain text.
    ///
    /// At most `max_tool_steps` rounds of tool calls run. After that the model
    /// is asked once more without tools and must answer in text.
    ///
    /// Returns the events produced during the turn, ending with the agent's reply.
    /// If the turn fails after tools ran, the error is [`Error::IncompleteTurn`]
    /// carrying those events.
    pub async fn step(&self, history: &[Event], runtime: &dyn Runtime) -> Result<Vec<Event>, Error> {
        let mut produced = Vec::new();
        match self.run_turn(history, runtime, &mut produced).await {
            Ok(()) => Ok(produced),
            Err(e) if produced.is_empty() => Err(e),
            Err(e) => Err(Error::IncompleteTurn {
                events: produced,
                source: Box::new(e),
            }),
        }
    }

    async fn run_turn(
        &self,
        history: &[Event],
        runtime: &dyn Runtime,
        produced: &mut Vec<Event>,
    ) -> Result<(), Error> {
        let mut messages = self.history_messages(history);

        let genai_tools: Vec<genai::chat::Tool> = runtime
            .tools()
            .iter()
            .map(|t| genai::chat::Tool {
                name: t.name(),
                description: Some(t.description()),
                schema: Some(t.parameters()),
                config: None,
            })
            .collect();

        let tools_arg = if genai_tools.is_empty() {
            None
        } else {
            Some(genai_tools)
        };

        for round in 0..=self.max_tool_steps {
            let budget_left = round < self.max_tool_steps;
            let tools = if budget_left { tools_arg.clone() } else { None };
            let response = self.llm.completion(messages.clone(), tools).await?;

            if response.tool_calls.is_empty() {
                produced.push(Event::agent(response.content));
                return Ok(());
            }

            if !budget_left {
                tracing::warn!(
                    "Model requested {} more tool call(s) after {} tool steps",
                    response.tool_calls.len(),
                    self.max_tool_steps
                );
                break;
            }

            let thought = (!response.content.is_empty()).then(|| response.content.clone());

            let mut assistant_parts = vec![];
            if let Some(thought) = &thought {
                assistant_parts.push(ContentPart::Text(thought.clone()));
            }
            for tool_call in &response.tool_calls {
                assistant_parts.push(ContentPart::ToolCall(tool_call.clone()));
            }
            messages.push(ChatMessage {
                role: ChatRole::Assistant,
                content: assistant_parts.into(),
                options: None,
            });

            for (i, tool_call) in response.tool_calls.iter().enumerate() {
                tracing::info!(
                    "Agent executing tool: {} with args: {}",
                    tool_call.fn_name,
                    tool_call.fn_arguments
                );

                let (content, is_error) = match runtime
                    .execute(&tool_call.fn_name, tool_call.fn_arguments.clone())
                    .await
                {
                    Ok(s) => (s, false),
                    Err(e) => (e.to_string(), true),
                };

                if is_error {
                    tracing::warn!("Tool {} failed: {}", tool_call.fn_name, content);
                } else {
                    tracing::debug!("Tool {} output: {}", tool_call.fn_name, content);
                }

                messages.push(ChatMessage::from(ToolResponse::new(
                    tool_call.call_id.clone(),
                    content.clone(),
                )));

                produced.push(Event::Action(ActionEvent {
                    source: SOURCE_AGENT.to_string(),
                    tool_name: tool_call.fn_name.clone(),
                    tool_call_id: tool_call.call_id.clone(),
                    arguments: tool_call.fn_arguments.clone(),
                    thought: if i == 0 { thought.clone() } else { None },
                    timestamp: Utc::now(),
                }));
                produced.push(Event::Observation(ObservationEvent {
                    source: "tool".to_string(),
                    tool_name: tool_call.fn_name.clone(),
                    tool_call_id: tool_call.call_id.clone(),
                    content,
                    is_error,
                    timestamp: Utc::now(),
                }));
            }
        }

        Err(Error::MaxToolSteps(self.max_tool_steps))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{call, text, ScriptedModel};
    use super::*;
    use crate::agent::tools::ordering_tools;
    use crate::llm::LLMResponse;
    use crate::desk::OrderDesk;
    use crate::llm::{LLMConfig, LLM};
    use crate::menu::{MenuSource, SpiceRouteMenu};
    use crate::order::OrderedItem;
    use crate::receipt::ReceiptWriter;
    use crate::runtime::LocalRuntime;
    use tempfile::TempDir;

    async fn desk_and_runtime() -> (Arc<OrderDesk>, LocalRuntime, TempDir) {
        let dir = TempDir::new().unwrap();
        let desk = Arc::new(OrderDesk::new(
            SpiceRouteMenu.load_menu().await,
            ReceiptWriter::new(dir.path().join("receipt.json")),
        ));
        let runtime = LocalRuntime::new(ordering_tools(desk.clone()));
        (desk, runtime, dir)
    }

    #[tokio::test]
    async fn test_tool_loop_adds_item() {
        let (desk, runtime, _dir) = desk_and_runtime().await;
        let model = Arc::new(ScriptedModel::new(vec![
            call(
                "call_1",
                "order_regular_item",
                serde_json::json!({ "item_id": "vada_pav", "size": "null" }),
            ),
            text("Alright, one Vada Pav!"),
        ]));
        let agent = Agent::new(model.clone(), "instructions".to_string());

        let events = agent
            .step(&[Event::user("just a vada pav")], &runtime)
            .await
            .unwrap();

        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], Event::Action(a) if a.tool_name == "order_regular_item"));
        assert!(matches!(&events[1], Event::Observation(o) if !o.is_error && o.content.starts_with("The item was added")));
        assert!(matches!(&events[2], Event::Message(m) if m.content == "Alright, one Vada Pav!"));

        let items = desk.list_order_items().await;
        assert_eq!(items.len(), 1);
        assert!(matches!(&items[0], OrderedItem::Regular(r) if r.item_id == "vada_pav"));

        // system + user, then + assistant call + tool response
        assert_eq!(*model.requests.lock().unwrap(), vec![2, 4]);
    }

    #[tokio::test]
    async fn test_tool_errors_are_fed_back() {
        let (desk, runtime, _dir) = desk_and_runtime().await;
        let model = Arc::new(ScriptedModel::new(vec![
            call(
                "call_1",
                "order_regular_item",
                serde_json::json!({ "item_id": "mango_lassi" }),
            ),
            text("What size would you like?"),
        ]));
        let agent = Agent::new(model, "instructions".to_string());

        let events = agent
            .step(&[Event::user("a mango lassi")], &runtime)
            .await
            .unwrap();

        match &events[1] {
            Event::Observation(o) => {
                assert!(o.is_error);
                assert!(o.content.contains("comes with multiple sizes"));
            }
            other => panic!("expected observation, got {:?}", other),
        }
        assert!(desk.list_order_items().await.is_empty());
    }

    #[tokio::test]
    async fn test_history_replay_includes_tool_events() {
        let (_desk, runtime, _dir) = desk_and_runtime().await;
        let model = Arc::new(ScriptedModel::new(vec![
            call("call_1", "list_order_items", serde_json::json!({})),
            text("Your order is empty."),
            text("Sure."),
        ]));
        let agent = Agent::new(model.clone(), "instructions".to_string());

        let mut history = vec![Event::user("what's in my order?")];
        let events = agent.step(&history, &runtime).await.unwrap();
        history.extend(events);
        history.push(Event::user("thanks"));
        agent.step(&history, &runtime).await.unwrap();

        // system + user + action + observation + reply + user
        assert_eq!(model.requests.lock().unwrap().last(), Some(&6));
    }

    fn vada_pav_calls(n: usize) -> Vec<LLMResponse> {
        (0..n)
            .map(|i| {
                call(
                    &format!("call_{}", i),
                    "order_regular_item",
                    serde_json::json!({ "item_id": "vada_pav" }),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_max_tool_steps() {
        let (desk, runtime, _dir) = desk_and_runtime().await;
        let model = Arc::new(ScriptedModel::new(vada_pav_calls(5)));
        let agent = Agent::new(model.clone(), "instructions".to_string()).with_max_tool_steps(2);

        let err = agent
            .step(&[Event::user("vada pav")], &runtime)
            .await
            .unwrap_err();

        match err {
            Error::IncompleteTurn { events, source } => {
                assert!(matches!(*source, Error::MaxToolSteps(2)));
                // two rounds, each an action and its observation
                assert_eq!(events.len(), 4);
                assert!(matches!(&events[3], Event::Observation(o) if !o.is_error));
            }
            other => panic!("expected an incomplete turn, got {:?}", other),
        }
        assert_eq!(desk.list_order_items().await.len(), 2);
        assert_eq!(*model.tools_offered.lock().unwrap(), vec![true, true, false]);
    }

    #[tokio::test]
    async fn test_final_answer_after_tool_budget() {
        let (desk, runtime, _dir) = desk_and_runtime().await;
        let mut responses = vada_pav_calls(2);
        responses.push(text("Two Vada Pavs, anything else?"));
        let model = Arc::new(ScriptedModel::new(responses));
        let agent = Agent::new(model.clone(), "instructions".to_string()).with_max_tool_steps(2);

        let events = agent
            .step(&[Event::user("two vada pav")], &runtime)
            .await
            .unwrap();

        assert_eq!(events.len(), 5);
        assert!(matches!(&events[4], Event::Message(m) if m.content == "Two Vada Pavs, anything else?"));
        assert_eq!(desk.list_order_items().await.len(), 2);
        assert_eq!(*model.tools_offered.lock().unwrap(), vec![true, true, false]);
    }

    #[tokio::test]
    async fn test_failure_before_any_tool_is_plain() {
        let (_desk, runtime, _dir) = desk_and_runtime().await;
        let model = Arc::new(ScriptedModel::new(vada_pav_calls(1)));
        let agent = Agent::new(model, "instructions".to_string()).with_max_tool_steps(0);

        let err = agent
            .step(&[Event::user("vada pav")], &runtime)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MaxToolSteps(0)));
    }

    #[tokio::test]
    async fn test_agent_live_order() {
        dotenv::dotenv().ok();
        let api_key = std::env::var("OPENAI_API_KEY").ok();
        if api_key.is_none() {
            println!("Skipping test_agent_live_order because OPENAI_API_KEY is not set");
            return;
        }

        let (desk, runtime, _dir) = desk_and_runtime().await;
        let llm = LLM::new(LLMConfig {
            api_key,
            ..LLMConfig::default()
        });
        let instructions = crate::instructions::agent_instructions(desk.menu());
        let agent = Agent::new(Arc::new(llm), instructions);

        let events = agent
            .step(&[Event::user("Can I get one Gulab Jamun please?")], &runtime)
            .await
            .expect("Step failed");

        assert!(matches!(events.last(), Some(Event::Message(_))));
        println!("Order after live turn: {:?}", desk.list_order_items().await);
    }
}
