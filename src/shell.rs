use std::fmt::Write;

/// Top-level pages; every subcommand lives on one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Form,
    Dashboard,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Home, Page::Form, Page::Dashboard];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Form => "Report Rescue",
            Page::Dashboard => "Dashboard",
        }
    }

    pub fn commands(&self) -> &'static [&'static str] {
        match self {
            Page::Home => &["home"],
            Page::Form => &["submit"],
            Page::Dashboard => &[
                "stats",
                "list",
                "show",
                "start",
                "rescue",
                "reopen",
                "set-status",
                "refresh",
                "clear",
                "seed",
                "export",
            ],
        }
    }
}

/// Navigation menu with the current page marked.
pub fn render_menu(current: Page) -> String {
    let mut out = String::from("ResQConnect\n");
    for page in Page::ALL {
        let marker = if page == current { '*' } else { ' ' };
        let _ = writeln!(
            out,
            " {} {:<14} {}",
            marker,
            page.title(),
            page.commands().join(", ")
        );
    }
    out
}
