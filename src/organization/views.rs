//! Organization request handlers.

use std::sync::Arc;

use axum::http::Method;
use serde::Deserialize;
use serde_json::json;

use crate::handler::{HandlerError, HandlerResponse, HandlerResult, RequestContext, ResourceHandler};
use crate::organization::model::{DirectoryError, OrganizationDirectory, OrganizationPatch};

impl From<DirectoryError> for HandlerError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NameTaken(_) => HandlerError::Conflict(err.to_string()),
            DirectoryError::Missing(_) => HandlerError::NotFound(err.to_string()),
        }
    }
}

fn to_body<T: serde::Serialize>(value: &T) -> HandlerResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| HandlerError::BadRequest(e.to_string()))
}

#[derive(Deserialize)]
struct CreateOrganization {
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct UpdateOrganization {
    id: Option<u64>,
    name: Option<String>,
    description: Option<String>,
    is_active: Option<bool>,
}

/// Create, fetch and update organizations.
///
/// Bound to `create-org/`, `org/<int:id>/` and `update/`.
pub struct OrganizationResource {
    directory: Arc<OrganizationDirectory>,
}

impl OrganizationResource {
    pub fn new(directory: Arc<OrganizationDirectory>) -> Self {
        Self { directory }
    }

    /// The path capture names the target on `org/<int:id>/`; `update/` takes
    /// it from the body. A body id that disagrees with the path is rejected.
    fn apply_update(&self, ctx: &RequestContext) -> HandlerResult<HandlerResponse> {
        let req: UpdateOrganization = ctx.json()?;
        let id = match (ctx.params.get_int("id"), req.id) {
            (Some(path_id), Some(body_id)) if path_id != body_id => {
                return Err(HandlerError::BadRequest(format!(
                    "body id {} does not match path id {}",
                    body_id, path_id
                )));
            }
            (Some(id), _) | (None, Some(id)) => id,
            (None, None) => return Err(HandlerError::BadRequest("organization id is required".into())),
        };
        if req.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(HandlerError::BadRequest("name must not be blank".into()));
        }

        let updated = self.directory.update(
            id,
            OrganizationPatch {
                name: req.name.map(|n| n.trim().to_string()),
                description: req.description,
                is_active: req.is_active,
            },
        )?;

        tracing::info!(id = updated.id, name = %updated.name, "Organization updated");
        Ok(HandlerResponse::ok(to_body(&updated)?))
    }
}

impl ResourceHandler for OrganizationResource {
    fn name(&self) -> &'static str {
        "OrganizationResource"
    }

    fn allowed_methods(&self) -> Vec<Method> {
        vec![Method::GET, Method::POST, Method::PUT, Method::PATCH]
    }

    fn get(&self, ctx: &RequestContext) -> HandlerResult<HandlerResponse> {
        match ctx.params.get_int("id") {
            Some(id) => {
                let org = self
                    .directory
                    .get(id)
                    .ok_or(DirectoryError::Missing(id))?;
                Ok(HandlerResponse::ok(to_body(&org)?))
            }
            None => Ok(HandlerResponse::ok(to_body(&self.directory.list())?)),
        }
    }

    fn post(&self, ctx: &RequestContext) -> HandlerResult<HandlerResponse> {
        let req: CreateOrganization = ctx.json()?;
        let name = req.name.trim();
        if name.is_empty() {
            return Err(HandlerError::BadRequest("name must not be blank".into()));
        }

        let org = self.directory.create(name, &req.description)?;
        tracing::info!(id = org.id, name = %org.name, "Organization created");
        Ok(HandlerResponse::created(to_body(&org)?))
    }

    fn put(&self, ctx: &RequestContext) -> HandlerResult<HandlerResponse> {
        self.apply_update(ctx)
    }

    fn patch(&self, ctx: &RequestContext) -> HandlerResult<HandlerResponse> {
        self.apply_update(ctx)
    }
}

/// Look up an organization's id by name (`?name=`).
pub struct GetOrganizationId {
    directory: Arc<OrganizationDirectory>,
}

impl GetOrganizationId {
    pub fn new(directory: Arc<OrganizationDirectory>) -> Self {
        Self { directory }
    }
}

impl ResourceHandler for GetOrganizationId {
    fn name(&self) -> &'static str {
        "GetOrganizationId"
    }

    fn allowed_methods(&self) -> Vec<Method> {
        vec![Method::GET]
    }

    fn get(&self, ctx: &RequestContext) -> HandlerResult<HandlerResponse> {
        let name = ctx.required_query("name")?;
        let org = self
            .directory
            .find_by_name(name)
            .ok_or_else(|| HandlerError::NotFound(format!("no organization named {:?}", name)))?;
        Ok(HandlerResponse::ok(json!({ "organization_id": org.id })))
    }
}

/// Report whether an organization with the given name exists (`?name=`).
pub struct IsOrganization {
    directory: Arc<OrganizationDirectory>,
}

impl IsOrganization {
    pub fn new(directory: Arc<OrganizationDirectory>) -> Self {
        Self { directory }
    }
}

impl ResourceHandler for IsOrganization {
    fn name(&self) -> &'static str {
        "IsOrganization"
    }

    fn allowed_methods(&self) -> Vec<Method> {
        vec![Method::GET]
    }

    fn get(&self, ctx: &RequestContext) -> HandlerResult<HandlerResponse> {
        let name = ctx.required_query("name")?;
        let body = match self.directory.find_by_name(name) {
            Some(org) => json!({ "exists": true, "id": org.id }),
            None => json!({ "exists": false }),
        };
        Ok(HandlerResponse::ok(body))
    }
}

/// Report the active status of one organization.
pub struct CheckOrganization {
    directory: Arc<OrganizationDirectory>,
}

impl CheckOrganization {
    pub fn new(directory: Arc<OrganizationDirectory>) -> Self {
        Self { directory }
    }
}

impl ResourceHandler for CheckOrganization {
    fn name(&self) -> &'static str {
        "CheckOrganization"
    }

    fn allowed_methods(&self) -> Vec<Method> {
        vec![Method::GET]
    }

    fn get(&self, ctx: &RequestContext) -> HandlerResult<HandlerResponse> {
        let id = ctx
            .params
            .get_int("id")
            .ok_or_else(|| HandlerError::BadRequest("organization id is required".into()))?;
        let org = self.directory.get(id).ok_or(DirectoryError::Missing(id))?;
        Ok(HandlerResponse::ok(json!({ "id": org.id, "is_active": org.is_active })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Params;
    use axum::http::StatusCode;

    fn directory() -> Arc<OrganizationDirectory> {
        Arc::new(OrganizationDirectory::new())
    }

    #[test]
    fn test_create_then_fetch() {
        let dir = directory();
        let resource = OrganizationResource::new(dir.clone());

        let ctx = RequestContext::default().with_body(json!({ "name": " acme ", "description": "anvils" }));
        let res = resource.post(&ctx).unwrap();
        assert_eq!(res.status, StatusCode::CREATED);
        assert_eq!(res.body["name"], "acme");
        assert_eq!(res.body["id"], 1);

        let ctx = RequestContext::new(Params::new().with("id", 1u64));
        let res = resource.get(&ctx).unwrap();
        assert_eq!(res.body["description"], "anvils");

        let ctx = RequestContext::new(Params::new().with("id", 2u64));
        assert!(matches!(resource.get(&ctx), Err(HandlerError::NotFound(_))));
    }

    #[test]
    fn test_create_validation() {
        let resource = OrganizationResource::new(directory());

        let blank = RequestContext::default().with_body(json!({ "name": "   " }));
        assert!(matches!(resource.post(&blank), Err(HandlerError::BadRequest(_))));

        let missing = RequestContext::default();
        assert!(matches!(resource.post(&missing), Err(HandlerError::BadRequest(_))));

        let ok = RequestContext::default().with_body(json!({ "name": "acme" }));
        resource.post(&ok).unwrap();
        assert!(matches!(resource.post(&ok), Err(HandlerError::Conflict(_))));
    }

    #[test]
    fn test_list_without_id() {
        let dir = directory();
        dir.create("a", "").unwrap();
        dir.create("b", "").unwrap();

        let res = OrganizationResource::new(dir).get(&RequestContext::default()).unwrap();
        assert_eq!(res.body.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_update() {
        let dir = directory();
        dir.create("acme", "").unwrap();
        let resource = OrganizationResource::new(dir);

        let ctx = RequestContext::default().with_body(json!({ "id": 1, "is_active": false }));
        let res = resource.patch(&ctx).unwrap();
        assert_eq!(res.body["is_active"], false);
        assert_eq!(res.body["name"], "acme");

        let ctx = RequestContext::default().with_body(json!({ "id": 9, "name": "x" }));
        assert!(matches!(resource.put(&ctx), Err(HandlerError::NotFound(_))));

        let missing_id = RequestContext::default().with_body(json!({ "is_active": true }));
        assert!(matches!(resource.put(&missing_id), Err(HandlerError::BadRequest(_))));

        assert!(matches!(
            resource.delete(&RequestContext::default()),
            Err(HandlerError::MethodNotAllowed { .. })
        ));
    }

    #[test]
    fn test_update_targets_path_id() {
        let dir = directory();
        dir.create("one", "").unwrap();
        dir.create("two", "").unwrap();
        let resource = OrganizationResource::new(dir.clone());
        let on_detail = |body: serde_json::Value| {
            RequestContext::new(Params::new().with("id", 1u64)).with_body(body)
        };

        let res = resource.put(&on_detail(json!({ "name": "renamed" }))).unwrap();
        assert_eq!(res.body["id"], 1);
        assert_eq!(dir.get(1).unwrap().name, "renamed");

        let res = resource.patch(&on_detail(json!({ "id": 1, "is_active": false }))).unwrap();
        assert_eq!(res.body["is_active"], false);

        assert!(matches!(
            resource.put(&on_detail(json!({ "id": 2, "name": "hijack" }))),
            Err(HandlerError::BadRequest(_))
        ));
        assert_eq!(dir.get(2).unwrap().name, "two");
    }

    #[test]
    fn test_lookup_handlers() {
        let dir = directory();
        dir.create("acme", "").unwrap();

        let by_name = RequestContext::default().with_query("name", "acme");
        let unknown = RequestContext::default().with_query("name", "globex");

        let res = GetOrganizationId::new(dir.clone()).get(&by_name).unwrap();
        assert_eq!(res.body, json!({ "organization_id": 1 }));
        assert!(matches!(
            GetOrganizationId::new(dir.clone()).get(&unknown),
            Err(HandlerError::NotFound(_))
        ));

        let is_org = IsOrganization::new(dir.clone());
        assert_eq!(is_org.get(&by_name).unwrap().body, json!({ "exists": true, "id": 1 }));
        assert_eq!(is_org.get(&unknown).unwrap().body, json!({ "exists": false }));
        assert!(matches!(
            is_org.get(&RequestContext::default()),
            Err(HandlerError::BadRequest(_))
        ));
    }

    #[test]
    fn test_check_status() {
        let dir = directory();
        dir.create("acme", "").unwrap();
        let check = CheckOrganization::new(dir);

        let res = check
            .get(&RequestContext::new(Params::new().with("id", 1u64)))
            .unwrap();
        assert_eq!(res.body, json!({ "id": 1, "is_active": true }));

        assert!(matches!(
            check.get(&RequestContext::new(Params::new().with("id", 5u64))),
            Err(HandlerError::NotFound(_))
        ));
    }
}
