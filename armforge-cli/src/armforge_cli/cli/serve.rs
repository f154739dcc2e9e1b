use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use armforge::{
    app_config::AppConfigProvider,
    sink::{
        config::{
            static_credentials, AwsConfigProvider, ObjectStoreProvider,
        },
        DocumentSink, LocalDirSink, ObjectStoreSink,
    },
    template::SkeletonSource,
    web::{self, AppState},
};
use aws_config::Region;
use clap::{Args, Parser, Subcommand, ValueHint};

use super::Cli;

#[derive(Parser, Debug)]
pub struct Serve {
    /// The address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub listen: SocketAddr,
    /// Path to the ARM template skeleton.
    #[arg(long, default_value = "assets/arm_template.json")]
    pub skeleton: PathBuf,
    #[clap(subcommand)]
    pub sink: SinkCommands,
}

#[derive(Subcommand, Debug)]
pub enum SinkCommands {
    /// Store generated documents in a local directory.
    Local(LocalArgs),
    /// Upload generated documents to an S3-compatible object store.
    ObjectStore(ObjectStoreArgs),
}

#[derive(Args, Debug)]
pub struct LocalArgs {
    /// The directory to write generated documents into.
    #[arg(long, default_value = "generated")]
    pub output_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct ObjectStoreArgs {
    /// The bucket to upload generated documents into.
    #[arg(long)]
    pub bucket: Arc<str>,
    /// The key prefix to upload under.
    #[arg(long, default_value = "inbound")]
    pub prefix: Arc<str>,
    /// The AWS profile to use.
    #[arg(long)]
    pub profile: Option<Arc<str>>,
    /// The region to use.
    #[arg(long)]
    pub region: Option<Arc<str>>,
    /// A custom endpoint URL, for S3-compatible stores.
    #[arg(long, value_hint = ValueHint::Url, value_parser = url::Url::parse)]
    pub endpoint_url: Option<url::Url>,
    /// An explicit access key id; the ambient AWS environment provides
    /// credentials when absent.
    #[arg(long, requires = "secret_key")]
    pub access_key: Option<Arc<str>>,
    /// The secret key paired with `--access-key`.
    #[arg(long, env = "ARMFORGE_STORAGE_KEY", requires = "access_key")]
    pub secret_key: Option<Arc<str>>,
}

impl Cli {
    pub async fn run_serve(&self, args: &Serve) -> anyhow::Result<()> {
        let skeleton = SkeletonSource::init(self, &args.skeleton).await?;

        let sink: Arc<dyn DocumentSink> = match &args.sink {
            SinkCommands::Local(local) => {
                tracing::info!(
                    dir = %local.output_dir.display(),
                    "Storing generated documents locally."
                );
                Arc::new(LocalDirSink::new(&local.output_dir))
            },
            SinkCommands::ObjectStore(store) => {
                let mut aws_config = aws_config::from_env();
                if let Some(profile) = &store.profile {
                    aws_config = aws_config.profile_name(profile.as_ref());
                }
                if let Some(region) = &store.region {
                    aws_config = aws_config
                        .region(Region::new(region.as_ref().to_owned()));
                }
                if let Some(endpoint) = &store.endpoint_url {
                    aws_config = aws_config.endpoint_url(endpoint.as_str());
                }
                if let (Some(access_key), Some(secret_key)) =
                    (&store.access_key, &store.secret_key)
                {
                    aws_config = aws_config.credentials_provider(
                        static_credentials(access_key, secret_key),
                    );
                }

                let config_provider = GenericConfigProvider {
                    aws_config: aws_config.load().await,
                    bucket: Arc::clone(&store.bucket),
                    prefix: Arc::clone(&store.prefix),
                    path_style: store.endpoint_url.is_some(),
                };
                tracing::info!(
                    bucket = %store.bucket,
                    prefix = %store.prefix,
                    "Uploading generated documents to object storage."
                );
                Arc::new(ObjectStoreSink::new(&config_provider))
            },
        };

        web::serve(args.listen, AppState { skeleton, sink }).await
    }
}

impl AppConfigProvider for Cli {
    fn is_dev_mode(&self) -> bool { self.dev }
}

struct GenericConfigProvider {
    aws_config: aws_config::SdkConfig,
    bucket: Arc<str>,
    prefix: Arc<str>,
    path_style: bool,
}

impl AwsConfigProvider for GenericConfigProvider {
    fn get_aws_config(&self) -> &aws_config::SdkConfig { &self.aws_config }
}

impl ObjectStoreProvider for GenericConfigProvider {
    fn get_bucket_name(&self) -> &str { &self.bucket }

    fn get_key_prefix(&self) -> &str { &self.prefix }

    fn use_path_style(&self) -> bool { self.path_style }
}
