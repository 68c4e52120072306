//! EC2-backed discovery of VPC networking.
//!
//! Requires AWS credentials from the usual chain (environment variables,
//! credentials file, or an attached role). All calls are read-only describe
//! operations. The four child-kind fetches run concurrently; the provider's
//! rate limits bound that at four in-flight calls.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_ec2::Client;
use aws_sdk_ec2::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_ec2::types::{
    Filter, InternetGateway, RouteTable, SecurityGroup, Subnet, Tag, Vpc, VpcAttributeName,
};
use serde_json::Value;
use std::collections::BTreeMap;

use super::{
    DiscoveredResource, DiscoveryError, DiscoveryResult, NetworkDiscovery, NetworkTopology,
    ResourceKind,
};

/// Live EC2 discovery for a single region
pub struct Ec2NetworkDiscovery {
    client: Client,
    region: String,
}

impl Ec2NetworkDiscovery {
    /// Create a discovery client for a region, loading AWS configuration
    /// from the standard credential chain
    pub async fn new(region: impl Into<String>) -> Self {
        let region = region.into();
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.clone()))
            .load()
            .await;

        Self {
            client: Client::new(&sdk_config),
            region,
        }
    }

    async fn fetch_vpc(&self, vpc_id: &str) -> DiscoveryResult<DiscoveredResource> {
        let response = self
            .client
            .describe_vpcs()
            .vpc_ids(vpc_id)
            .send()
            .await
            .map_err(|e| classify_vpc_error(vpc_id, e))?;

        let vpc = response
            .vpcs()
            .first()
            .ok_or_else(|| DiscoveryError::NotFound {
                vpc_id: vpc_id.to_string(),
            })?;

        let (dns_support, dns_hostnames) = self.fetch_dns_flags(vpc_id).await?;
        Ok(map_vpc(vpc, dns_support, dns_hostnames))
    }

    async fn fetch_dns_flags(&self, vpc_id: &str) -> DiscoveryResult<(bool, bool)> {
        let support = self
            .client
            .describe_vpc_attribute()
            .vpc_id(vpc_id)
            .attribute(VpcAttributeName::EnableDnsSupport)
            .send()
            .await
            .map_err(provider_error)?;

        let hostnames = self
            .client
            .describe_vpc_attribute()
            .vpc_id(vpc_id)
            .attribute(VpcAttributeName::EnableDnsHostnames)
            .send()
            .await
            .map_err(provider_error)?;

        Ok((
            support
                .enable_dns_support()
                .and_then(|v| v.value())
                .unwrap_or(true),
            hostnames
                .enable_dns_hostnames()
                .and_then(|v| v.value())
                .unwrap_or(true),
        ))
    }

    async fn fetch_subnets(&self, vpc_id: &str) -> DiscoveryResult<Vec<DiscoveredResource>> {
        let response = self
            .client
            .describe_subnets()
            .filters(vpc_filter("vpc-id", vpc_id))
            .send()
            .await
            .map_err(provider_error)?;

        Ok(response.subnets().iter().map(map_subnet).collect())
    }

    async fn fetch_internet_gateways(
        &self,
        vpc_id: &str,
    ) -> DiscoveryResult<Vec<DiscoveredResource>> {
        let response = self
            .client
            .describe_internet_gateways()
            .filters(vpc_filter("attachment.vpc-id", vpc_id))
            .send()
            .await
            .map_err(provider_error)?;

        Ok(response
            .internet_gateways()
            .iter()
            .map(map_internet_gateway)
            .collect())
    }

    async fn fetch_route_tables(&self, vpc_id: &str) -> DiscoveryResult<Vec<DiscoveredResource>> {
        let response = self
            .client
            .describe_route_tables()
            .filters(vpc_filter("vpc-id", vpc_id))
            .send()
            .await
            .map_err(provider_error)?;

        Ok(response.route_tables().iter().map(map_route_table).collect())
    }

    async fn fetch_security_groups(
        &self,
        vpc_id: &str,
    ) -> DiscoveryResult<Vec<DiscoveredResource>> {
        let response = self
            .client
            .describe_security_groups()
            .filters(vpc_filter("vpc-id", vpc_id))
            .send()
            .await
            .map_err(provider_error)?;

        Ok(response
            .security_groups()
            .iter()
            .map(map_security_group)
            .collect())
    }
}

impl NetworkDiscovery for Ec2NetworkDiscovery {
    fn discover(
        &self,
        vpc_id: &str,
    ) -> impl std::future::Future<Output = DiscoveryResult<NetworkTopology>> + Send {
        async move {
            // The parent fetch runs first so an unknown VPC ID fails before
            // anything else; the child fetches then run concurrently.
            let vpc = self.fetch_vpc(vpc_id).await?;

            let (subnets, internet_gateways, route_tables, security_groups) = futures::try_join!(
                self.fetch_subnets(vpc_id),
                self.fetch_internet_gateways(vpc_id),
                self.fetch_route_tables(vpc_id),
                self.fetch_security_groups(vpc_id),
            )?;

            Ok(NetworkTopology {
                region: self.region.clone(),
                vpc,
                subnets,
                internet_gateways,
                route_tables,
                security_groups,
            })
        }
    }
}

fn vpc_filter(name: &str, vpc_id: &str) -> Filter {
    Filter::builder().name(name).values(vpc_id).build()
}

fn provider_error<E>(err: SdkError<E>) -> DiscoveryError
where
    E: ProvideErrorMetadata + std::fmt::Debug,
{
    let code = err.code().unwrap_or_default().to_string();
    let message = err
        .message()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("{:?}", err));

    DiscoveryError::Provider {
        message: if code.is_empty() {
            message
        } else {
            format!("{}: {}", code, message)
        },
    }
}

fn classify_vpc_error<E>(vpc_id: &str, err: SdkError<E>) -> DiscoveryError
where
    E: ProvideErrorMetadata + std::fmt::Debug,
{
    if err.code().is_some_and(is_not_found_code) {
        DiscoveryError::NotFound {
            vpc_id: vpc_id.to_string(),
        }
    } else {
        provider_error(err)
    }
}

fn is_not_found_code(code: &str) -> bool {
    code.ends_with(".NotFound") || code.ends_with(".Malformed")
}

fn tag_map(tags: &[Tag]) -> BTreeMap<String, String> {
    tags.iter()
        .filter_map(|t| Some((t.key()?.to_string(), t.value()?.to_string())))
        .collect()
}

fn map_vpc(vpc: &Vpc, dns_support: bool, dns_hostnames: bool) -> DiscoveredResource {
    let mut resource =
        DiscoveredResource::new(ResourceKind::Vpc, vpc.vpc_id().unwrap_or_default())
            .with_tags(tag_map(vpc.tags()))
            .with_attribute("enable_dns_support", Value::Bool(dns_support))
            .with_attribute("enable_dns_hostnames", Value::Bool(dns_hostnames));

    if let Some(cidr) = vpc.cidr_block() {
        resource = resource.with_cidr_block(cidr);
    }

    resource
}

fn map_subnet(subnet: &Subnet) -> DiscoveredResource {
    let mut resource =
        DiscoveredResource::new(ResourceKind::Subnet, subnet.subnet_id().unwrap_or_default())
            .with_tags(tag_map(subnet.tags()));

    if let Some(cidr) = subnet.cidr_block() {
        resource = resource.with_cidr_block(cidr);
    }
    if let Some(vpc_id) = subnet.vpc_id() {
        resource = resource.with_attribute("vpc_id", Value::String(vpc_id.to_string()));
    }
    if let Some(az) = subnet.availability_zone() {
        resource = resource.with_attribute("availability_zone", Value::String(az.to_string()));
    }

    resource
}

fn map_internet_gateway(igw: &InternetGateway) -> DiscoveredResource {
    let mut resource = DiscoveredResource::new(
        ResourceKind::InternetGateway,
        igw.internet_gateway_id().unwrap_or_default(),
    )
    .with_tags(tag_map(igw.tags()));

    if let Some(vpc_id) = igw.attachments().first().and_then(|a| a.vpc_id()) {
        resource = resource.with_attribute("vpc_id", Value::String(vpc_id.to_string()));
    }

    resource
}

fn map_route_table(rt: &RouteTable) -> DiscoveredResource {
    let mut resource = DiscoveredResource::new(
        ResourceKind::RouteTable,
        rt.route_table_id().unwrap_or_default(),
    )
    .with_tags(tag_map(rt.tags()));

    if let Some(vpc_id) = rt.vpc_id() {
        resource = resource.with_attribute("vpc_id", Value::String(vpc_id.to_string()));
    }

    let is_main = rt
        .associations()
        .iter()
        .any(|a| a.main().unwrap_or(false));
    resource.with_attribute("main", Value::Bool(is_main))
}

fn map_security_group(sg: &SecurityGroup) -> DiscoveredResource {
    let mut resource = DiscoveredResource::new(
        ResourceKind::SecurityGroup,
        sg.group_id().unwrap_or_default(),
    )
    .with_tags(tag_map(sg.tags()));

    if let Some(vpc_id) = sg.vpc_id() {
        resource = resource.with_attribute("vpc_id", Value::String(vpc_id.to_string()));
    }
    if let Some(name) = sg.group_name() {
        resource = resource.with_attribute("name", Value::String(name.to_string()));
    }
    if let Some(description) = sg.description() {
        resource = resource.with_attribute("description", Value::String(description.to_string()));
    }

    resource
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ec2::types::{InternetGatewayAttachment, RouteTableAssociation};

    fn name_tag(value: &str) -> Tag {
        Tag::builder().key("Name").value(value).build()
    }

    #[test]
    fn test_map_vpc() {
        let vpc = Vpc::builder()
            .vpc_id("vpc-12345")
            .cidr_block("10.0.0.0/16")
            .tags(name_tag("main"))
            .build();

        let resource = map_vpc(&vpc, true, false);

        assert_eq!(resource.kind, ResourceKind::Vpc);
        assert_eq!(resource.resource_id, "vpc-12345");
        assert_eq!(resource.cidr_block.as_deref(), Some("10.0.0.0/16"));
        assert_eq!(resource.tags.get("Name"), Some(&"main".to_string()));
        assert!(resource.attribute_bool("enable_dns_support", false));
        assert!(!resource.attribute_bool("enable_dns_hostnames", true));
    }

    #[test]
    fn test_map_subnet() {
        let subnet = Subnet::builder()
            .subnet_id("subnet-67890")
            .vpc_id("vpc-12345")
            .cidr_block("10.0.1.0/24")
            .availability_zone("us-east-1a")
            .tags(name_tag("private"))
            .build();

        let resource = map_subnet(&subnet);

        assert_eq!(resource.kind, ResourceKind::Subnet);
        assert_eq!(resource.resource_id, "subnet-67890");
        assert_eq!(resource.cidr_block.as_deref(), Some("10.0.1.0/24"));
        assert_eq!(resource.attribute_str("vpc_id"), "vpc-12345");
        assert_eq!(resource.attribute_str("availability_zone"), "us-east-1a");
    }

    #[test]
    fn test_map_internet_gateway_attachment() {
        let igw = InternetGateway::builder()
            .internet_gateway_id("igw-1")
            .attachments(
                InternetGatewayAttachment::builder()
                    .vpc_id("vpc-12345")
                    .build(),
            )
            .build();

        let resource = map_internet_gateway(&igw);

        assert_eq!(resource.kind, ResourceKind::InternetGateway);
        assert_eq!(resource.resource_id, "igw-1");
        assert_eq!(resource.attribute_str("vpc_id"), "vpc-12345");
    }

    #[test]
    fn test_map_route_table_main_flag() {
        let rt = RouteTable::builder()
            .route_table_id("rtb-1")
            .vpc_id("vpc-12345")
            .associations(RouteTableAssociation::builder().main(true).build())
            .build();

        let resource = map_route_table(&rt);

        assert_eq!(resource.resource_id, "rtb-1");
        assert!(resource.attribute_bool("main", false));
    }

    #[test]
    fn test_map_security_group() {
        let sg = SecurityGroup::builder()
            .group_id("sg-1")
            .group_name("web")
            .description("web tier")
            .vpc_id("vpc-12345")
            .build();

        let resource = map_security_group(&sg);

        assert_eq!(resource.resource_id, "sg-1");
        assert_eq!(resource.attribute_str("name"), "web");
        assert_eq!(resource.attribute_str("description"), "web tier");
        assert_eq!(resource.attribute_str("vpc_id"), "vpc-12345");
    }

    #[test]
    fn test_tag_map_skips_incomplete_tags() {
        let tags = vec![
            Tag::builder().key("Name").value("main").build(),
            Tag::builder().key("orphan-key").build(),
        ];

        let map = tag_map(&tags);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("Name"), Some(&"main".to_string()));
    }

    #[test]
    fn test_not_found_codes() {
        assert!(is_not_found_code("InvalidVpcID.NotFound"));
        assert!(is_not_found_code("InvalidVpcId.Malformed"));
        assert!(!is_not_found_code("RequestLimitExceeded"));
        assert!(!is_not_found_code("UnauthorizedOperation"));
    }
}
