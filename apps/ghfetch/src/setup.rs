//! Wiring of configuration into downloader collaborators

use ghfetch_config::Config;
use ghfetch_errors::Error;
use ghfetch_events::EventSender;
use ghfetch_net::{GitHubClient, HttpTransport, NetClient, NetConfig};
use ghfetch_strategy::{GitHubDownloader, GitHubHosts, StrategyKind};
use ghfetch_types::{Credential, PackageRef};

pub type Downloader = GitHubDownloader<GitHubClient, HttpTransport>;

/// Shared HTTP clients, hosts and credential for one CLI invocation
pub struct FetchSetup {
    api: GitHubClient,
    transport: HttpTransport,
    hosts: GitHubHosts,
    credential: Option<Credential>,
    token_env: String,
    tx: EventSender,
}

impl FetchSetup {
    /// Build the collaborators described by `config`
    ///
    /// The credential is read from the configured environment variable here
    /// and nowhere else.
    pub fn new(config: &Config, tx: EventSender) -> Result<Self, Error> {
        let web_url = config.github.web_url()?;
        let api_url = config.github.api_url()?;
        let credential = Credential::from_env(&config.github.token_env);

        let client = NetClient::new(NetConfig::from(&config.network))?;
        let api = GitHubClient::new(client.clone(), &api_url).with_credential(credential.clone());
        let transport = HttpTransport::new(client)
            .with_chunk_timeout(config.network.chunk_timeout())
            .with_events(tx.clone());

        tracing::debug!(
            web = %web_url,
            api = %api_url,
            token_env = %config.github.token_env,
            has_credential = credential.is_some(),
            "download setup"
        );

        Ok(Self {
            api,
            transport,
            hosts: GitHubHosts::new(&web_url, &api_url),
            credential,
            token_env: config.github.token_env.clone(),
            tx,
        })
    }

    /// Parse `url`, check the credential and validate repository access
    pub async fn downloader(
        &self,
        kind: StrategyKind,
        url: &str,
        package: PackageRef,
    ) -> Result<Downloader, Error> {
        GitHubDownloader::builder(self.api.clone(), self.transport.clone())
            .hosts(self.hosts.clone())
            .token_env(self.token_env.clone())
            .credential(self.credential.clone())
            .package(package)
            .events(self.tx.clone())
            .build(kind, url)
            .await
    }
}
