pub mod lambda_client;

pub use lambda_client::{AwsLambdaApi, ClientOptions};
