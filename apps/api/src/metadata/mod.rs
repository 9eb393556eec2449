// YouTube metadata generation.
// Flow: render prompt → TextGenerator → parse JSON → validate schema → bilingual policy,
// retried with corrective feedback until the attempt budget is spent.
// All backend calls go through llm_client::TextGenerator — no direct API calls here.

pub mod bilingual;
pub mod bundle;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod pipeline;
pub mod prompts;
pub mod renderer;
pub mod retry;
pub mod schema;
pub mod validator;

#[cfg(test)]
pub(crate) mod test_support;
