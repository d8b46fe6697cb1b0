use crate::form::FormInput;
use crate::record::{Status, Urgency};
use crate::shell::Page;
use crate::views::{ListFilters, SortMode, StatusFilter, UrgencyFilter};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "resq")]
#[command(about = "Log and triage animal rescue requests")]
#[command(version = "1.0")]
pub(crate) struct Args {
    /// JSON file holding every rescue request
    #[arg(short, long, global = true, default_value = "resq_requests.json")]
    pub store: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Show the navigation menu
    Home,
    /// Report a new rescue request
    Submit(SubmitArgs),
    /// Show request counts by status
    Stats,
    /// List requests with the dashboard filters
    List(ListArgs),
    /// Show every detail of one request
    Show { id: String },
    /// Start the rescue of a pending request
    Start { id: String },
    /// Mark an in-progress request as rescued
    Rescue { id: String },
    /// Move an in-progress request back to pending
    Reopen { id: String },
    /// Move a request to any status the transition table allows
    SetStatus {
        id: String,
        #[arg(value_parser = parse_status)]
        status: Status,
    },
    /// Re-read the store and redraw the dashboard
    Refresh {
        #[command(flatten)]
        list: ListArgs,

        /// Cosmetic refresh delay in milliseconds
        #[arg(long, default_value = "500")]
        delay: u64,
    },
    /// Delete every request
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Add three sample requests
    Seed,
    /// Write the filtered list as CSV
    Export {
        #[command(flatten)]
        list: ListArgs,

        /// Output CSV filename
        #[arg(short, long, default_value = "requests.csv")]
        output: String,
    },
}

impl Command {
    pub fn page(&self) -> Page {
        match self {
            Command::Home => Page::Home,
            Command::Submit(_) => Page::Form,
            _ => Page::Dashboard,
        }
    }
}

fn parse_status(s: &str) -> Result<Status, String> {
    s.parse()
}

#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum UrgencyChoice {
    Critical,
    High,
    Medium,
}

impl From<UrgencyChoice> for Urgency {
    fn from(choice: UrgencyChoice) -> Self {
        match choice {
            UrgencyChoice::Critical => Urgency::Critical,
            UrgencyChoice::High => Urgency::High,
            UrgencyChoice::Medium => Urgency::Medium,
        }
    }
}

#[derive(clap::Args)]
pub(crate) struct SubmitArgs {
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub pincode: String,
    #[arg(long = "animal-type")]
    pub animal_type: String,
    #[arg(long)]
    pub condition: String,
    /// Defaults to medium when not chosen
    #[arg(short, long, value_enum)]
    pub urgency: Option<UrgencyChoice>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long = "reporter-name")]
    pub reporter_name: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub latitude: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub longitude: Option<String>,

    /// Look up the current position before submitting
    #[arg(short, long)]
    pub locate: bool,

    /// IP geolocation endpoint used by --locate
    #[arg(long, default_value = "http://ip-api.com/json/?fields=status,message,lat,lon")]
    pub geo_endpoint: String,

    /// Location lookup timeout in seconds
    #[arg(long, default_value = "10")]
    pub geo_timeout: u64,
}

impl SubmitArgs {
    pub fn form_input(&self) -> FormInput {
        FormInput {
            latitude: self.latitude.clone(),
            longitude: self.longitude.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            pincode: self.pincode.clone(),
            animal_type: self.animal_type.clone(),
            condition: self.condition.clone(),
            urgency: self.urgency.map(Urgency::from),
            description: self.description.clone(),
            reporter_name: self.reporter_name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(clap::Args, Clone)]
pub(crate) struct ListArgs {
    #[arg(long, value_enum, default_value_t = StatusFilter::All)]
    pub status: StatusFilter,

    #[arg(long, value_enum, default_value_t = UrgencyFilter::All)]
    pub urgency: UrgencyFilter,

    #[arg(long, value_enum, default_value_t = SortMode::Newest)]
    pub sort: SortMode,
}

impl ListArgs {
    pub fn filters(&self) -> ListFilters {
        ListFilters {
            status: self.status,
            urgency: self.urgency,
            sort: self.sort,
        }
    }
}
