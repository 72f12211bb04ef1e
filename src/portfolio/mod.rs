//! Static personal-portfolio page rendered from a JSON content document.

pub mod content;
pub mod render;
pub mod server;

pub use content::{or_na, Contact, PortfolioContent, Project, Service, Social};
pub use render::{html_escape, render_page, render_to_file};
pub use server::{router, serve, serve_on, SiteState};
