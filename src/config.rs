//! Command line and environment configuration.
//!
//! Every flag has an environment fallback; the binary loads a `.env` file
//! with `dotenvy` before parsing.

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;

use crate::domain::{Coord, LocationId};
use crate::dto::{Algorithm, RouteRequest, TimeOfDay};
use crate::view::{MapDefaults, DEFAULT_ATTRIBUTION, DEFAULT_TILE_URL};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: PlannerConfig,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The subcommand to run; `serve` when none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

/// Settings shared by every subcommand.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Base URL of the optimization backend.
    #[arg(long, env = "PLANNER_BACKEND_URL", default_value = "http://127.0.0.1:5000", global = true)]
    pub backend_url: String,

    /// Address the HTTP API listens on.
    #[arg(long, env = "PLANNER_BIND", default_value = "0.0.0.0:7860", global = true)]
    pub bind: SocketAddr,

    /// Tile URL template for every view's base layer.
    #[arg(long, env = "PLANNER_TILE_URL", default_value = DEFAULT_TILE_URL, global = true)]
    pub tile_url: String,

    #[arg(long, env = "PLANNER_TILE_ATTRIBUTION", default_value = DEFAULT_ATTRIBUTION, global = true)]
    pub tile_attribution: String,

    /// Latitude of the default camera center.
    #[arg(long, env = "PLANNER_DEFAULT_LAT", default_value_t = 30.04, global = true)]
    pub default_lat: f64,

    /// Longitude of the default camera center.
    #[arg(long, env = "PLANNER_DEFAULT_LNG", default_value_t = 31.24, global = true)]
    pub default_lng: f64,

    #[arg(long, env = "PLANNER_DEFAULT_ZOOM", default_value_t = 11, global = true)]
    pub default_zoom: u8,

    /// Padding in pixels around fitted bounds.
    #[arg(long, env = "PLANNER_FIT_PADDING", default_value_t = 50.0, global = true)]
    pub fit_padding: f64,
}

impl PlannerConfig {
    /// Map defaults copied into every view at initialization.
    pub fn map_defaults(&self) -> MapDefaults {
        MapDefaults {
            center: Coord::new(self.default_lat, self.default_lng),
            zoom: self.default_zoom,
            fit_padding: self.fit_padding,
            tile_url: self.tile_url.clone(),
            attribution: self.tile_attribution.clone(),
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Optimize the road network
    Network {
        #[arg(long, value_enum, default_value_t = Algorithm::Prim)]
        algorithm: Algorithm,
        /// Weight roads by the population they serve
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        prioritize_population: bool,
    },
    /// Shortest route between two locations
    Route(RouteArgs),
    /// Fastest route to a hospital
    Emergency(RouteArgs),
    /// Optimize metro and bus schedules and road maintenance
    Transport,
    /// Optimize traffic signal timing
    Signals {
        /// Intersections to optimize; the backend picks when none are given
        #[arg(long, value_delimiter = ',')]
        intersections: Vec<LocationId>,
        #[arg(long, value_enum, default_value_t = TimeOfDay::Morning)]
        time_of_day: TimeOfDay,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct RouteArgs {
    #[arg(long)]
    pub start: LocationId,
    #[arg(long)]
    pub end: LocationId,
    #[arg(long, value_enum, default_value_t = TimeOfDay::Morning)]
    pub time_of_day: TimeOfDay,
}

impl From<RouteArgs> for RouteRequest {
    fn from(args: RouteArgs) -> Self {
        Self {
            start: args.start,
            end: args.end,
            time_of_day: args.time_of_day,
        }
    }
}
