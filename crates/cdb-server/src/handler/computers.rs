//! Computer handlers for listing, reading, creating, replacing and deleting
//! computers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;

use crate::extract::{Json, Path, Query, ValidateJson};
use crate::handler::request::{ComputerPathParams, ComputerRequest, DeleteComputers, ListComputers};
use crate::handler::response::{
    Computer, ComputerCreated, ComputersPage, Created, ErrorResponse, Page,
};
use crate::handler::{ErrorKind, Result};
use crate::service::{Catalog, ListingConfig, ServiceState, Validated};

/// Tracing target for computer operations.
const TRACING_TARGET: &str = "cdb_server::handler::computers";

/// Lists one page of computers.
#[tracing::instrument(
    skip_all,
    fields(page = query.page, page_size = query.page_size)
)]
async fn list_computers(
    State(catalog): State<Catalog>,
    State(listing): State<ListingConfig>,
    Query(query): Query<ListComputers>,
) -> Result<(StatusCode, Json<ComputersPage>)> {
    let request = query.into_listing_request(&listing)?;
    let page = catalog.list_computers(&request).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        total_elements = page.total_elements,
        "Computers listed",
    );

    Ok((StatusCode::OK, Json(Page::from_page(page, Computer::from_model))))
}

fn list_computers_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List computers")
        .description(
            "Returns one page of computers whose name or company name contains the search \
            term. Unknown sort columns and directions fall back to name, ascending.",
        )
        .response::<200, Json<ComputersPage>>()
        .response::<400, Json<ErrorResponse>>()
}

/// Retrieves a computer with the name of its company.
#[tracing::instrument(skip_all, fields(computer_id = path_params.computer_id))]
async fn read_computer(
    State(catalog): State<Catalog>,
    Path(path_params): Path<ComputerPathParams>,
) -> Result<(StatusCode, Json<Computer>)> {
    let Some(computer) = catalog.get_computer(path_params.computer_id).await? else {
        return Err(ErrorKind::NotFound
            .with_message(format!(
                "Computer {} does not exist",
                path_params.computer_id
            ))
            .with_resource("computer"));
    };

    Ok((StatusCode::OK, Json(Computer::from_model(computer))))
}

fn read_computer_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get computer")
        .description("Returns a computer joined with the name of its company.")
        .response::<200, Json<Computer>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Creates a computer after checking every business rule.
#[tracing::instrument(skip_all)]
async fn create_computer(
    State(catalog): State<Catalog>,
    Json(request): Json<ComputerRequest>,
) -> Result<Created<ComputerCreated>> {
    match catalog.create_computer(&request.into_draft()).await? {
        Validated::Valid(id) => {
            tracing::info!(target: TRACING_TARGET, computer_id = id, "Computer created");
            Ok(Created::new(format!("/computers/{id}"), ComputerCreated { id }))
        }
        Validated::Invalid(result) => Err(result.into()),
    }
}

fn create_computer_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create computer")
        .description(
            "Creates a computer. The body must not carry an id. Every broken business rule is \
            reported per field.",
        )
        .response::<201, Json<ComputerCreated>>()
        .response::<400, Json<ErrorResponse>>()
}

/// Replaces a computer; the path id wins over any id in the body.
#[tracing::instrument(skip_all, fields(computer_id = path_params.computer_id))]
async fn update_computer(
    State(catalog): State<Catalog>,
    Path(path_params): Path<ComputerPathParams>,
    Json(request): Json<ComputerRequest>,
) -> Result<StatusCode> {
    let draft = request.into_draft().with_id(path_params.computer_id);

    match catalog.update_computer(&draft).await? {
        Validated::Valid(()) => {
            tracing::info!(target: TRACING_TARGET, "Computer updated");
            Ok(StatusCode::NO_CONTENT)
        }
        Validated::Invalid(result) => Err(result.into()),
    }
}

fn update_computer_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Replace computer")
        .description("Replaces every field of an existing computer.")
        .response_with::<204, (), _>(|res| res.description("Computer replaced."))
        .response::<400, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Deletes a computer and returns it as it was.
#[tracing::instrument(skip_all, fields(computer_id = path_params.computer_id))]
async fn delete_computer(
    State(catalog): State<Catalog>,
    Path(path_params): Path<ComputerPathParams>,
) -> Result<(StatusCode, Json<Computer>)> {
    let computer = catalog.delete_computer(path_params.computer_id).await?;
    tracing::info!(target: TRACING_TARGET, "Computer deleted");
    Ok((StatusCode::OK, Json(Computer::from_model(computer))))
}

fn delete_computer_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete computer")
        .description("Deletes a computer and returns it.")
        .response::<200, Json<Computer>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Deletes several computers at once, ignoring unknown ids.
#[tracing::instrument(skip_all, fields(requested = request.ids.len()))]
async fn delete_computers(
    State(catalog): State<Catalog>,
    ValidateJson(request): ValidateJson<DeleteComputers>,
) -> Result<StatusCode> {
    let deleted = catalog.delete_computers(&request.ids).await?;
    tracing::info!(target: TRACING_TARGET, deleted, "Computers deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn delete_computers_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete computers")
        .description("Deletes every listed computer. Unknown ids are ignored.")
        .response_with::<204, (), _>(|res| res.description("Computers deleted."))
        .response::<400, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with all computer-related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/computers",
            get_with(list_computers, list_computers_docs)
                .post_with(create_computer, create_computer_docs)
                .delete_with(delete_computers, delete_computers_docs),
        )
        .api_route(
            "/computers/{computerId}",
            get_with(read_computer, read_computer_docs)
                .put_with(update_computer, update_computer_docs)
                .delete_with(delete_computer, delete_computer_docs),
        )
        .with_path_items(|item| item.tag("Computers"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::handler::response::{Computer, ComputerCreated, ComputersPage};
    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn create_then_read_computer() -> anyhow::Result<()> {
        let (server, store) = create_test_server()?;
        let apple = store.insert_company("Apple Inc.").await;

        let response = server
            .post("/computers")
            .json(&json!({
                "name": "Apple II",
                "introduced": "1977-04-01",
                "discontinued": "1993-10-01",
                "companyId": apple.id,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let ComputerCreated { id } = response.json();
        assert_eq!(response.header("location"), format!("/computers/{id}"));

        let computer: Computer = server.get(&format!("/computers/{id}")).await.json();
        assert_eq!(computer.name, "Apple II");
        assert_eq!(computer.introduced, Some(jiff::civil::date(1977, 4, 1)));
        assert_eq!(computer.company_name.as_deref(), Some("Apple Inc."));
        Ok(())
    }

    #[tokio::test]
    async fn invalid_computers_report_each_field() -> anyhow::Result<()> {
        let (server, _) = create_test_server()?;

        let response = server
            .post("/computers")
            .json(&json!({
                "name": " ",
                "discontinued": "2001-01-01",
                "companyId": 99,
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json();
        let fields: Vec<_> = body["validation"]
            .as_array()
            .map(|details| details.iter().map(|d| d["field"].clone()).collect())
            .unwrap_or_default();
        assert_eq!(fields, [json!("company"), json!("discontinued"), json!("name")]);
        Ok(())
    }

    #[tokio::test]
    async fn creating_with_an_id_is_rejected() -> anyhow::Result<()> {
        let (server, _) = create_test_server()?;

        let response = server
            .post("/computers")
            .json(&json!({ "id": 5, "name": "Lisa" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn missing_computers_are_not_found() -> anyhow::Result<()> {
        let (server, _) = create_test_server()?;

        let response = server.get("/computers/42").await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: serde_json::Value = response.json();
        assert!(body["message"].as_str().is_some_and(|m| m.contains("Computer 42 does not exist")));

        server
            .put("/computers/42")
            .json(&json!({ "name": "Lisa" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .delete("/computers/42")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn update_uses_the_path_id() -> anyhow::Result<()> {
        let (server, _) = create_test_server()?;
        let ComputerCreated { id } = server
            .post("/computers")
            .json(&json!({ "name": "Lisa" }))
            .await
            .json();

        server
            .put(&format!("/computers/{id}"))
            .json(&json!({ "id": 999, "name": "Lisa 2", "introduced": "1983-01-19" }))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let computer: Computer = server.get(&format!("/computers/{id}")).await.json();
        assert_eq!(computer.name, "Lisa 2");
        Ok(())
    }

    #[tokio::test]
    async fn list_filters_sorts_and_pages() -> anyhow::Result<()> {
        let (server, store) = create_test_server()?;
        let ibm = store.insert_company("IBM").await;
        for name in ["ThinkPad", "PC", "Amiga"] {
            let company_id = (name != "Amiga").then_some(ibm.id);
            server
                .post("/computers")
                .json(&json!({ "name": name, "companyId": company_id }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let page: ComputersPage = server
            .get("/computers")
            .add_query_param("search", "ibm")
            .add_query_param("sort", "NAME")
            .add_query_param("order", "desc")
            .add_query_param("pageSize", 1)
            .await
            .json();
        assert_eq!(page.total_elements, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.elements[0].name, "ThinkPad");

        let response = server
            .get("/computers")
            .add_query_param("page", 5)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let error: serde_json::Value = response.json();
        assert_eq!(error["name"], "bad_request");
        Ok(())
    }

    #[tokio::test]
    async fn bulk_delete_ignores_unknown_ids() -> anyhow::Result<()> {
        let (server, _) = create_test_server()?;
        let ComputerCreated { id } = server
            .post("/computers")
            .json(&json!({ "name": "Lisa" }))
            .await
            .json();

        server
            .delete("/computers")
            .json(&json!({ "ids": [id, 1234] }))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/computers/{id}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let response = server.delete("/computers").json(&json!({ "ids": [] })).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let error: serde_json::Value = response.json();
        assert_eq!(error["name"], "validation_error");
        Ok(())
    }
}
