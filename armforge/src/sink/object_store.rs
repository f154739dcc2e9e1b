use aws_sdk_s3::{primitives::ByteStream, Client};
use aws_smithy_types::body::SdkBody;

use super::{
    config::{AwsConfigProvider, ObjectStoreProvider},
    DocumentSink,
};

fn get_client(config: &(impl AwsConfigProvider + ObjectStoreProvider)) -> Client {
    let mut s3_config =
        aws_sdk_s3::config::Builder::from(config.get_aws_config());
    if config.use_path_style() {
        s3_config = s3_config.force_path_style(true);
    }
    Client::from_conf(s3_config.build())
}

fn join_key(prefix: &str, filename: &str) -> Box<str> {
    if prefix.is_empty() {
        filename.into()
    } else {
        format!("{}/{}", prefix, filename).into()
    }
}

/// Uploads generated documents as objects under the configured key prefix.
pub struct ObjectStoreSink {
    client: Client,
    bucket: Box<str>,
    prefix: Box<str>,
}

impl ObjectStoreSink {
    pub fn new(config: &(impl AwsConfigProvider + ObjectStoreProvider)) -> Self {
        Self {
            client: get_client(config),
            bucket: config.get_bucket_name().into(),
            prefix: config.get_key_prefix().trim_matches('/').into(),
        }
    }
}

#[async_trait::async_trait]
impl DocumentSink for ObjectStoreSink {
    #[tracing::instrument(level = "debug", skip(self, body))]
    async fn store(&self, filename: &str, body: &[u8]) -> anyhow::Result<()> {
        let key = join_key(&self.prefix, filename);

        self.client
            .put_object()
            .bucket(self.bucket.as_ref())
            .key(key.as_ref())
            .content_type("application/json")
            .body(ByteStream::new(SdkBody::from(body)))
            .send()
            .await?;

        tracing::debug!(%key, "Put object complete.");

        Ok(())
    }
}

#[test]
fn join_key_test() {
    assert_eq!(
        join_key("inbound", "a.json").as_ref(),
        "inbound/a.json"
    );
    assert_eq!(join_key("", "a.json").as_ref(), "a.json");
}
