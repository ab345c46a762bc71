use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};

use crate::config::StoreConfig;

/// Creates an S3 client from the configured credentials, region and endpoint.
///
/// Anything left unset is resolved by the SDK's default provider chains.
pub async fn create_s3_client(config: &StoreConfig) -> Client {
    let mut loader = aws_config::from_env();
    if let Some(creds) = &config.credentials {
        let credentials = Credentials::new(
            creds.access_key.clone(),
            creds.secret_key.clone(),
            creds.session_token.clone(),
            None,
            "environment",
        );
        loader = loader.credentials_provider(credentials);
    }
    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    let sdk_config = loader.load().await;

    let mut s3_config = aws_sdk_s3::config::Builder::from(&sdk_config);
    if let Some(endpoint) = &config.endpoint_url {
        // S3-compatible stores rarely serve virtual-hosted buckets.
        s3_config = s3_config.endpoint_url(endpoint).force_path_style(true);
    }
    Client::from_conf(s3_config.build())
}
