//! pneumoscan-web: Web GUI for Pneumoscan
//! Server-rendered pages for:
//!   - Landing page with role selection
//!   - Doctor's dashboard (upload + full result panels)
//!   - Drag-and-drop analysis page with report download
//!   - Student page with follow-up chat
//!   - Mock profile page

pub mod router;
pub mod handlers;
pub mod state;
pub mod templates;
pub mod error;
