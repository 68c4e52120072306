//! The fixed Terraform documents written by the scaffolder.
//!
//! These are static text; every value flows in through terraform.tfvars,
//! which the variable file generator writes separately.

/// Root module: provider wiring plus the call into the network module
pub const ROOT_MAIN_TF: &str = r#"provider "aws" {
  region = var.aws_region
}

module "network" {
  source = "./modules/network"

  aws_region               = var.aws_region
  vpc_configs              = var.vpc_configs
  subnet_configs           = var.subnet_configs
  internet_gateway_configs = var.internet_gateway_configs
  route_table_configs      = var.route_table_configs
  security_group_configs   = var.security_group_configs
}
"#;

pub const ROOT_VARIABLES_TF: &str = r#"variable "aws_region" {
  description = "AWS region the adopted network lives in"
  type        = string
}

variable "vpc_configs" {
  description = "Adopted VPC configurations, keyed by VPC ID"
  type = map(object({
    cidr_block           = string
    enable_dns_support   = bool
    enable_dns_hostnames = bool
    tags                 = map(string)
  }))
  default = {}
}

variable "subnet_configs" {
  description = "Adopted subnet configurations, keyed by subnet ID"
  type = map(object({
    vpc_id            = string
    cidr_block        = string
    availability_zone = string
    tags              = map(string)
  }))
  default = {}
}

variable "internet_gateway_configs" {
  description = "Adopted internet gateway configurations, keyed by gateway ID"
  type = map(object({
    vpc_id = string
    tags   = map(string)
  }))
  default = {}
}

variable "route_table_configs" {
  description = "Adopted route table configurations, keyed by route table ID"
  type = map(object({
    vpc_id = string
    tags   = map(string)
  }))
  default = {}
}

variable "security_group_configs" {
  description = "Adopted security group configurations, keyed by group ID"
  type = map(object({
    name        = string
    description = string
    vpc_id      = string
    tags        = map(string)
  }))
  default = {}
}
"#;

pub const ROOT_BACKEND_TF: &str = r#"terraform {
  backend "local" {}
}
"#;

/// Network module: one for_each resource block per adopted kind
pub const NETWORK_MAIN_TF: &str = r#"resource "aws_vpc" "this" {
  for_each = var.vpc_configs

  cidr_block           = each.value.cidr_block
  enable_dns_support   = each.value.enable_dns_support
  enable_dns_hostnames = each.value.enable_dns_hostnames
  tags                 = each.value.tags
}

resource "aws_subnet" "this" {
  for_each = var.subnet_configs

  vpc_id            = each.value.vpc_id
  cidr_block        = each.value.cidr_block
  availability_zone = each.value.availability_zone
  tags              = each.value.tags
}

resource "aws_internet_gateway" "this" {
  for_each = var.internet_gateway_configs

  vpc_id = each.value.vpc_id
  tags   = each.value.tags
}

resource "aws_route_table" "this" {
  for_each = var.route_table_configs

  vpc_id = each.value.vpc_id
  tags   = each.value.tags
}

resource "aws_security_group" "this" {
  for_each = var.security_group_configs

  name        = each.value.name
  description = each.value.description
  vpc_id      = each.value.vpc_id
  tags        = each.value.tags
}
"#;

/// The network module declares the same variable surface the root forwards
pub const NETWORK_VARIABLES_TF: &str = ROOT_VARIABLES_TF;
