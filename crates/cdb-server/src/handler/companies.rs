//! Company handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;

use crate::extract::{Json, Path, Query};
use crate::handler::request::{CompanyPathParams, Pagination};
use crate::handler::response::{CompaniesPage, Company, ErrorResponse, Page};
use crate::handler::{ErrorKind, Result};
use crate::service::{Catalog, ListingConfig, ServiceState};

/// Tracing target for company operations.
const TRACING_TARGET: &str = "cdb_server::handler::companies";

/// Lists one page of companies sorted by name.
#[tracing::instrument(skip_all, fields(page = pagination.page))]
async fn list_companies(
    State(catalog): State<Catalog>,
    State(listing): State<ListingConfig>,
    Query(pagination): Query<Pagination>,
) -> Result<(StatusCode, Json<CompaniesPage>)> {
    let request = pagination.into_page_request(&listing)?;
    let page = catalog.list_companies(request).await?;
    Ok((StatusCode::OK, Json(Page::from_page(page, Company::from_model))))
}

fn list_companies_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List companies")
        .description("Returns one page of companies sorted by name.")
        .response::<200, Json<CompaniesPage>>()
        .response::<400, Json<ErrorResponse>>()
}

#[tracing::instrument(skip_all, fields(company_id = path_params.company_id))]
async fn read_company(
    State(catalog): State<Catalog>,
    Path(path_params): Path<CompanyPathParams>,
) -> Result<(StatusCode, Json<Company>)> {
    let Some(company) = catalog.get_company(path_params.company_id).await? else {
        return Err(ErrorKind::NotFound
            .with_message(format!(
                "Company {} does not exist",
                path_params.company_id
            ))
            .with_resource("company"));
    };

    Ok((StatusCode::OK, Json(Company::from_model(company))))
}

fn read_company_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get company")
        .response::<200, Json<Company>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Deletes a company together with every computer it introduced.
#[tracing::instrument(skip_all, fields(company_id = path_params.company_id))]
async fn delete_company(
    State(catalog): State<Catalog>,
    Path(path_params): Path<CompanyPathParams>,
) -> Result<(StatusCode, Json<Company>)> {
    let company = catalog.delete_company(path_params.company_id).await?;
    tracing::info!(target: TRACING_TARGET, "Company deleted");
    Ok((StatusCode::OK, Json(Company::from_model(company))))
}

fn delete_company_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete company")
        .description(
            "Deletes a company and every computer it introduced, then returns the deleted \
            company.",
        )
        .response::<200, Json<Company>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns a [`Router`] with all company-related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/companies", get_with(list_companies, list_companies_docs))
        .api_route(
            "/companies/{companyId}",
            get_with(read_company, read_company_docs)
                .delete_with(delete_company, delete_company_docs),
        )
        .with_path_items(|item| item.tag("Companies"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::handler::response::{CompaniesPage, Company, ComputerCreated};
    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn companies_are_listed_by_name() -> anyhow::Result<()> {
        let (server, store) = create_test_server()?;
        for name in ["RCA", "Apple Inc.", "Thinking Machines"] {
            store.insert_company(name).await;
        }

        let page: CompaniesPage = server
            .get("/companies")
            .add_query_param("pageSize", 2)
            .await
            .json();
        let names: Vec<_> = page.elements.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Apple Inc.", "RCA"]);
        assert_eq!(page.total_pages, 2);
        Ok(())
    }

    #[tokio::test]
    async fn deleting_a_company_removes_its_computers() -> anyhow::Result<()> {
        let (server, store) = create_test_server()?;
        let rca = store.insert_company("RCA").await;
        let ComputerCreated { id } = server
            .post("/computers")
            .json(&json!({ "name": "COSMAC VIP", "companyId": rca.id }))
            .await
            .json();

        let deleted: Company = server
            .delete(&format!("/companies/{}", rca.id))
            .await
            .json();
        assert_eq!(deleted.name, "RCA");

        server
            .get(&format!("/companies/{}", rca.id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get(&format!("/computers/{id}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn non_positive_ids_are_rejected() -> anyhow::Result<()> {
        let (server, _) = create_test_server()?;
        server
            .delete("/companies/0")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }
}
