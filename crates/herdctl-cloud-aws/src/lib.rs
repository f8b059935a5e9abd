//! AWS EC2 provider for herdctl
//!
//! Implements the `herdctl-cloud` session traits on top of
//! `aws-sdk-ec2`. Credentials and shared configuration are resolved
//! through the standard `aws-config` provider chain (environment,
//! profile, instance metadata).
//!
//! # Example
//!
//! ```ignore
//! use herdctl_cloud::SessionFactory;
//! use herdctl_cloud_aws::AwsSessionFactory;
//!
//! let factory = AwsSessionFactory::new();
//! let (control, query) = factory.open("us-east-1").await?;
//! let instances = query.describe_instances(None).await?;
//! ```

mod convert;
pub mod session;

pub use session::{AwsSessionFactory, Ec2Control, Ec2Query};
