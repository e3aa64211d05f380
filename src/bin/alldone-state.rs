//! alldone state builder CLI
//!
//! Produces the `state` value a device passes to the identity provider so
//! that the alldone endpoint can hand the authorization code back to it.
//!
//! ## Usage Examples
//!
//! ### Print a state value
//! ```bash
//! alldone-state --device-ip 192.168.1.5 --callback-path /oauth/callback
//! ```
//!
//! ### Print a complete authorization URL
//! ```bash
//! alldone-state --device-ip 192.168.1.5 --callback-path /oauth/callback \
//!   --client-id "1234.apps.googleusercontent.com" \
//!   --redirect-uri "https://example.run.app/alldone"
//! ```
//!
//! ## Environment Variables
//!
//! - `ALLDONE_CLIENT_ID`: OAuth client ID (alternative to --client-id)
//! - `ALLDONE_REDIRECT_URI`: public URL of the alldone endpoint (alternative to --redirect-uri)

use alldone::handoff::DeviceTarget;
use anyhow::Result;
use clap::Parser;
use url::Url;

const DEFAULT_AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

#[derive(Parser, Debug)]
#[command(
    name = "alldone-state",
    version,
    about = "Build the OAuth state value that routes an authorization code back to a device"
)]
struct Cli {
    /// Host (and optional port) of the device on the local network
    #[arg(long)]
    device_ip: String,

    /// Path on the device that receives the code
    #[arg(long)]
    callback_path: String,

    /// OAuth client ID, prints a full authorization URL when set with --redirect-uri
    #[arg(long, env = "ALLDONE_CLIENT_ID")]
    client_id: Option<String>,

    /// Public URL of the alldone endpoint registered with the provider
    #[arg(long, env = "ALLDONE_REDIRECT_URI")]
    redirect_uri: Option<String>,

    /// Space separated scopes to request
    #[arg(long, default_value = DEFAULT_SCOPE)]
    scope: String,

    /// Authorization endpoint of the identity provider
    #[arg(long, default_value = DEFAULT_AUTHORIZE_ENDPOINT)]
    authorize_endpoint: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let target = DeviceTarget {
        device_ip: cli.device_ip,
        callback_path: cli.callback_path,
    };
    let state = target.to_state();

    match (cli.client_id, cli.redirect_uri) {
        (Some(client_id), Some(redirect_uri)) => {
            let authorize_url = authorization_url(
                &cli.authorize_endpoint,
                &client_id,
                &redirect_uri,
                &cli.scope,
                &state,
            )?;
            println!("{authorize_url}");
        }
        (None, None) => println!("{state}"),
        _ => anyhow::bail!("--client-id and --redirect-uri must be given together"),
    }

    Ok(())
}

fn authorization_url(
    endpoint: &str,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    state: &str,
) -> Result<Url> {
    let mut url = Url::parse(endpoint)?;
    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("scope", scope)
        .append_pair("access_type", "offline")
        .append_pair("prompt", "consent")
        .append_pair("state", state);
    Ok(url)
}
