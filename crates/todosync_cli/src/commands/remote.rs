//! Client commands: ping, pull, push.

use crate::http_client::ReqwestClient;
use crate::RemoteArgs;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::time::Duration;
use todosync_client::{ClientConfig, SyncClient};
use todosync_protocol::StateDocument;
use tracing::info;

/// Client used by the remote commands.
pub type RemoteClient = SyncClient<ReqwestClient>;

/// Builds a client from the command-line options.
pub fn connect(args: &RemoteArgs) -> Result<RemoteClient, Box<dyn std::error::Error>> {
    let config = ClientConfig::new(args.url.clone(), String::new())
        .with_secret_file(&args.secret_file, !args.no_trim_secret)?;
    let http = ReqwestClient::new(Duration::from_secs(args.timeout))?;
    Ok(SyncClient::new(config, http))
}

/// Runs the ping command.
pub fn ping(client: &RemoteClient) -> Result<(), Box<dyn std::error::Error>> {
    client.test()?;
    println!("ok: {}", client.config().server_url);
    Ok(())
}

/// Runs the pull command.
pub fn pull(client: &RemoteClient, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let state = client.load()?;
    let json = state.encode_pretty()?;

    match output {
        Some(path) => {
            fs::write(path, &json)?;
            info!(
                path = %path.display(),
                checklist = state.checklist.len(),
                inventory = state.inventory.len(),
                "state written"
            );
        }
        None => println!("{}", String::from_utf8_lossy(&json)),
    }
    Ok(())
}

/// Runs the push command.
pub fn push(client: &RemoteClient, input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let state = read_state(input)?;
    client.save(&state)?;
    info!(
        checklist = state.checklist.len(),
        inventory = state.inventory.len(),
        "state pushed"
    );
    Ok(())
}

/// Reads a state document from a file, or stdin for `-`.
pub fn read_state(input: &Path) -> Result<StateDocument, Box<dyn std::error::Error>> {
    let data = if input == Path::new("-") {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        data
    } else {
        fs::read(input)?
    };
    Ok(StateDocument::decode(&data)?)
}
