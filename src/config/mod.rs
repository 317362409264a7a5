use args::{Args, CARGO_PKG_NAME};
use clap::Parser;
use endpoints::EndpointConfig;

use crate::ENDPOINT_CONFIG_LOCATION;

pub(crate) mod args;
pub(crate) mod endpoints;

pub(crate) struct Config {
    pub(crate) args: Args,
    pub(crate) endpoints: EndpointConfig,
}

impl Config {
    pub(crate) fn new() -> Config {
        let args = Args::parse();
        let endpoints = match &args.endpoint_config {
            Some(path) => EndpointConfig::load_path(path),
            None => EndpointConfig::load(CARGO_PKG_NAME, ENDPOINT_CONFIG_LOCATION),
        };
        Config { args, endpoints }
    }
}
