use aws_config::SdkConfig;

pub trait AwsConfigProvider {
    fn get_aws_config(&self) -> &SdkConfig;
}

pub trait ObjectStoreProvider {
    fn get_bucket_name(&self) -> &str;

    /// Key prefix generated documents are uploaded under.
    fn get_key_prefix(&self) -> &str {
        "inbound"
    }

    /// Path-style addressing, needed by most S3-compatible stores.
    fn use_path_style(&self) -> bool {
        false
    }
}

/// Static credentials for the explicit access-key/secret-key configuration
/// path; the ambient AWS environment is used otherwise.
pub fn static_credentials(
    access_key: &str,
    secret_key: &str,
) -> aws_sdk_s3::config::Credentials {
    aws_sdk_s3::config::Credentials::new(
        access_key, secret_key, None, None, "armforge",
    )
}
