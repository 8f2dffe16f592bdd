//! # Multi-Agent Research
//!
//! A small research assistant built from cooperating LLM agents:
//!
//! 1. **Splitter** - turns a topic into 2-3 narrower sub-topics
//! 2. **Researchers** - one per sub-topic, run concurrently: scholarly
//!    search plus an LLM summary with citations
//! 3. **Synthesizer** - merges the findings into one report in the
//!    requested style
//! 4. **Critic** - reviews the report; flagged issues trigger a bounded
//!    number of refinements
//!
//! ## Quick Start
//! ```rust,ignore
//! use multi_agent_research::{Config, Orchestrator, Style};
//!
//! let config = Config::from_env()?;
//! let orchestrator = Orchestrator::from_config(&config);
//! let result = orchestrator
//!     .orchestrate("Impact of AI on healthcare", Style::Academic, 2)
//!     .await?;
//! println!("{}", result.to_markdown());
//! ```

pub mod agents;
pub mod config;
pub mod error;
pub mod fanout;
pub mod llm;
pub mod model;
pub mod orchestrator;
pub mod report;
pub mod search;

pub use config::Config;
pub use error::{AgentError, OrchestrationError, SearchError, Stage};
pub use fanout::{fan_out, FailurePolicy};
pub use model::{ResearchFinding, ResearchResultSet, Style};
pub use orchestrator::Orchestrator;
pub use report::OrchestrationResult;
