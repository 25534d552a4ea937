// Library root
// -----------
// The binary (`main.rs`) only wires these modules together; everything
// it does lives here so it can be tested without a terminal.
//
// Module responsibilities:
// - `api`: blocking HTTP calls to the GroupMe API (group listing and
//   message pages) and the `MessageSource` seam used for pagination.
// - `config`: immutable settings read once from the environment.
// - `extract`: the LinkedIn URL pattern and `(sender, url)` collection.
// - `harvest`: walks a group's history page by page with a cursor.
// - `output`: prints the results and writes them to the output file.
// - `ui`: the interactive prompts and the end-to-end workflow.
pub mod api;
pub mod config;
pub mod extract;
pub mod harvest;
pub mod output;
pub mod ui;
