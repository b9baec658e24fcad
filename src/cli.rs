use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use url::Url;

use crate::codec::UrlParams;
use crate::model::{ChannelState, ViewerChannelSetting, ViewerState};
use crate::runtime::{
    CatalogRequest, DataSource, ViewerConfig, ViewerSession, ViewerSnapshot, load_config,
    load_document, normalize_share_params,
};

#[derive(Debug, Parser)]
#[command(
    name = "vole",
    version,
    about = "Decode, build and normalize volume viewer share links"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Prints the viewer state a share link (or bare query string) resolves to.
    Decode {
        link: String,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Channel names of the volume, to resolve per-channel settings.
        #[arg(long, value_delimiter = ',')]
        channels: Vec<String>,
    },
    /// Builds a share link from a JSON or YAML viewer snapshot.
    Encode {
        state: PathBuf,
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long)]
        keep_defaults: bool,
    },
    /// Re-encodes a share link with default values removed.
    Normalize {
        link: String,
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Prints the default viewer state.
    Defaults,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DecodedLink<'a> {
    viewer: &'a ViewerState,
    channel_settings: &'a [ViewerChannelSetting],
    channels: &'a [ChannelState],
    data_sources: &'a [DataSource],
    catalog: Option<&'a CatalogRequest>,
}

pub fn run_cli() -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Decode {
            link,
            config,
            channels,
        } => {
            let config = read_config(config.as_deref())?;
            let params = UrlParams::from_url_or_query(&link).map_err(|error| error.to_string())?;
            let mut session = ViewerSession::new(&config, &params);
            if !channels.is_empty() {
                session.on_channels_available(&channels);
            }
            let decoded = DecodedLink {
                viewer: session.store().viewer(),
                channel_settings: session.channel_settings(),
                channels: session.store().channels(),
                data_sources: session.data_sources(),
                catalog: session.catalog_request(),
            };
            print_json(&decoded)?;
        }
        Commands::Encode {
            state,
            base_url,
            keep_defaults,
        } => {
            let snapshot: ViewerSnapshot =
                load_document(&state).map_err(|error| error.to_string())?;
            let config = ViewerConfig {
                data_sources: snapshot.data_sources,
                ..ViewerConfig::default()
            };
            let mut session = ViewerSession::new(&config, &UrlParams::default());
            session.store_mut().replace_viewer_state(snapshot.viewer);
            session.store_mut().set_channel_states(snapshot.channels);
            let params = session.share_params(!keep_defaults);
            println!("{}", render_link(&params, base_url.as_deref())?);
        }
        Commands::Normalize {
            link,
            base_url,
            config,
        } => {
            let config = read_config(config.as_deref())?;
            let params = UrlParams::from_url_or_query(&link).map_err(|error| error.to_string())?;
            let normalized = normalize_share_params(&config, &params);
            let base = base_url.or_else(|| Url::parse(link.trim()).is_ok().then(|| link.clone()));
            println!("{}", render_link(&normalized, base.as_deref())?);
        }
        Commands::Defaults => {
            print_json(&ViewerState::default())?;
        }
    }

    Ok(())
}

fn read_config(path: Option<&Path>) -> Result<ViewerConfig, String> {
    match path {
        Some(path) => load_config(path).map_err(|error| error.to_string()),
        None => Ok(ViewerConfig::default()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).map_err(|error| error.to_string())?
    );
    Ok(())
}

fn render_link(params: &UrlParams, base: Option<&str>) -> Result<String, String> {
    match base {
        Some(base) => params.to_url(base).map_err(|error| error.to_string()),
        None => Ok(params.to_query()),
    }
}
