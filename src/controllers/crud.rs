//! CRUD controller methods shared by every entity.

use serde_json::json;

use crate::context::ServiceContext;
use crate::helpers::EntityKind;
use crate::http::ApiRequest;
use crate::routing::{HandlerResult, JsonReply, RegistryBuilder};

/// Register `create`, `update`, `details`, `list` and `delete` for `kind`.
pub fn register(builder: &mut RegistryBuilder, version: &'static str, kind: &'static EntityKind) {
    builder
        .controller(version, kind.controller, kind.file)
        .method("create", move |ctx: ServiceContext, req: ApiRequest| create(kind, ctx, req))
        .method("update", move |ctx: ServiceContext, req: ApiRequest| update(kind, ctx, req))
        .method("details", move |ctx: ServiceContext, req: ApiRequest| details(kind, ctx, req))
        .method("list", move |ctx: ServiceContext, req: ApiRequest| list(kind, ctx, req))
        .method("delete", move |ctx: ServiceContext, req: ApiRequest| delete(kind, ctx, req));
}

fn id_required(kind: &EntityKind) -> String {
    format!("{} id is required.", kind.label)
}

pub async fn create(kind: &'static EntityKind, ctx: ServiceContext, req: ApiRequest) -> HandlerResult {
    let id = kind.create(&ctx.db, &req.body, &req.actor())?;
    Ok(JsonReply::new(format!("{} created successfully.", kind.label))
        .result(json!({ "_id": id }))
        .into())
}

pub async fn update(kind: &'static EntityKind, ctx: ServiceContext, req: ApiRequest) -> HandlerResult {
    let id = req.require_id(&id_required(kind))?;
    let document = kind.update(&ctx.db, id, &req.body, &req.actor())?;
    Ok(JsonReply::new(format!("{} updated successfully.", kind.label))
        .result(document)
        .into())
}

pub async fn details(kind: &'static EntityKind, ctx: ServiceContext, req: ApiRequest) -> HandlerResult {
    let id = req.require_id(&id_required(kind))?;
    let document = kind.details(&ctx.db, id)?;
    Ok(JsonReply::new(format!("{} fetched successfully.", kind.label))
        .result(document)
        .into())
}

pub async fn list(kind: &'static EntityKind, ctx: ServiceContext, req: ApiRequest) -> HandlerResult {
    let page = kind.list(&ctx.db, &req.query, &req.pagination);
    let count = page.documents.len() as u64;
    Ok(JsonReply::new(format!("{} list fetched successfully.", kind.label))
        .result(page.documents.into())
        .total(page.total)
        .count(count)
        .into())
}

pub async fn delete(kind: &'static EntityKind, ctx: ServiceContext, req: ApiRequest) -> HandlerResult {
    let id = req.require_id(&id_required(kind))?;
    kind.delete(&ctx.db, id, &req.actor())?;
    Ok(JsonReply::new(format!("{} deleted successfully.", kind.label))
        .result(json!({ "_id": id }))
        .into())
}
