// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) wires these modules together and runs the interactive menu.
//
// Module responsibilities:
// - `config`: reads the Gemini key and Supabase credentials once at startup.
// - `error`: typed failures for the model and store boundaries.
// - `recommend`: prompt templates and the fail-soft recommendation call.
// - `gemini`: blocking HTTP client for the Gemini `generateContent` API.
// - `reviews`: review rows, input checks and the Supabase table client.
// - `view`: menu items, actions, outcomes and their rendering.
// - `ui`: terminal prompts that feed actions to the controller.
//
// `view` never touches the terminal, so the whole menu flow can be tested
// with fake clients.
pub mod config;
pub mod error;
pub mod gemini;
pub mod recommend;
pub mod reviews;
pub mod ui;
pub mod view;
