// Module layout (Clean Architecture style)
// - bootstrap: configuration and wiring
// - infrastructure: Studio HTTP client and reload broadcasting
// - presentation: command line host
// - application: ports, coordinators and the layout cache
// - domain: branches, repository status and form layouts

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
