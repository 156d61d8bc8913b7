//! Route declarations for the organization resource.
//!
//! Order is significant: patterns are tried top to bottom.

use std::sync::Arc;

use crate::handler::SharedHandler;
use crate::organization::model::OrganizationDirectory;
use crate::organization::views::{
    CheckOrganization, GetOrganizationId, IsOrganization, OrganizationResource,
};
use crate::routing::{RouteResult, RouteTable};

pub const ORGANIZATION_CREATE: &str = "organization_create";
pub const ORGANIZATION_DETAIL: &str = "organization_detail";
pub const ORGANIZATION_UPDATE: &str = "organization_update";
pub const ORGANIZATION_GET: &str = "organization_get";
pub const ORGANIZATION_CHECK: &str = "organization_check";
pub const ORGANIZATION_CHECK_STATUS: &str = "organization_check_status";

/// Build the organization route table over `directory`.
pub fn url_patterns(directory: Arc<OrganizationDirectory>) -> RouteResult<RouteTable<SharedHandler>> {
    let resource: SharedHandler = Arc::new(OrganizationResource::new(directory.clone()));
    let get_id: SharedHandler = Arc::new(GetOrganizationId::new(directory.clone()));
    let is_org: SharedHandler = Arc::new(IsOrganization::new(directory.clone()));
    let check: SharedHandler = Arc::new(CheckOrganization::new(directory));

    let table = RouteTable::builder()
        .register("create-org/", resource.clone(), ORGANIZATION_CREATE)?
        .register("org/<int:id>/", resource.clone(), ORGANIZATION_DETAIL)?
        .register("update/", resource, ORGANIZATION_UPDATE)?
        .register("get-org-id/", get_id, ORGANIZATION_GET)?
        .register("is-org/", is_org, ORGANIZATION_CHECK)?
        .register("check-org/<int:id>/", check, ORGANIZATION_CHECK_STATUS)?
        .build();

    Ok(table)
}
