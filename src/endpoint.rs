//! Table-driven endpoint descriptors.
//!
//! An [`Endpoint`] carries everything a generated endpoint method would
//! hard-code: tags, operation name, path template and the names of the query
//! and body parameters it accepts. Callers hand in loose arguments and the
//! descriptor turns them into a resource path and filtered parameter maps.

use http::Method;

use crate::metadata::EndpointMetadata;
use crate::pagination::EVENT_LOG_OPERATION;
use crate::params::{filter_params, resource_path, Params};
use crate::Result;

/// Static description of one dashboard operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Ordered tags, primary tag first.
    pub tags: &'static [&'static str],
    /// Operation identifier.
    pub operation: &'static str,
    /// HTTP method.
    pub method: EndpointMethod,
    /// Path template with `{name}` placeholders.
    pub path: &'static str,
    /// Accepted query parameter names.
    pub query_params: &'static [&'static str],
    /// Accepted body parameter names.
    pub body_params: &'static [&'static str],
}

/// HTTP method of an [`Endpoint`], kept `Copy` for use in statics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl From<EndpointMethod> for Method {
    fn from(method: EndpointMethod) -> Self {
        match method {
            EndpointMethod::Get => Method::GET,
            EndpointMethod::Post => Method::POST,
            EndpointMethod::Put => Method::PUT,
            EndpointMethod::Delete => Method::DELETE,
        }
    }
}

impl Endpoint {
    /// Metadata used for logging and errors.
    pub fn metadata(&self) -> EndpointMetadata {
        EndpointMetadata::new(self.tags.iter().copied(), self.operation)
    }

    /// Resource path with path parameters substituted.
    pub fn path(&self, path_args: &[(&str, &str)]) -> Result<String> {
        resource_path(self.path, path_args)
    }

    /// Query parameters accepted by this endpoint.
    pub fn query(&self, args: &Params) -> Params {
        filter_params(args, self.query_params)
    }

    /// Body parameters accepted by this endpoint.
    pub fn body(&self, args: &Params) -> Params {
        filter_params(args, self.body_params)
    }
}

/// List the events for the network.
///
/// Paginated with time-based cursors; see [`crate::pagination`] for the
/// termination rules specific to this operation.
pub const GET_NETWORK_EVENTS: Endpoint = Endpoint {
    tags: &["networks", "monitor", "events"],
    operation: EVENT_LOG_OPERATION,
    method: EndpointMethod::Get,
    path: "/networks/{networkId}/events",
    query_params: &[
        "productType",
        "includedEventTypes",
        "excludedEventTypes",
        "deviceMac",
        "deviceSerial",
        "deviceName",
        "clientIp",
        "clientMac",
        "clientName",
        "smDeviceMac",
        "smDeviceName",
        "perPage",
        "startingAfter",
        "endingBefore",
    ],
    body_params: &[],
};

/// Delete a network.
pub const DELETE_NETWORK: Endpoint = Endpoint {
    tags: &["networks", "configure"],
    operation: "deleteNetwork",
    method: EndpointMethod::Delete,
    path: "/networks/{networkId}",
    query_params: &[],
    body_params: &[],
};

/// List the networks that the user has privileges on in an organization.
pub const GET_ORGANIZATION_NETWORKS: Endpoint = Endpoint {
    tags: &["organizations", "configure", "networks"],
    operation: "getOrganizationNetworks",
    method: EndpointMethod::Get,
    path: "/organizations/{organizationId}/networks",
    query_params: &[
        "configTemplateId",
        "isBoundToConfigTemplate",
        "tags",
        "tagsFilterType",
        "productTypes",
        "perPage",
        "startingAfter",
        "endingBefore",
    ],
    body_params: &[],
};
