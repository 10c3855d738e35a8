use std::sync::Arc;

use leadgrid_runtime::{
    DepartmentGateway, LeadGateway, MutationError, RowGateway, fetch_options,
};
use leadgrid_testing::ScriptedApiClient;
use leadgrid_types::{Classification, DepartmentDraft, LeadPatch};
use serde_json::json;

fn lead_json(id: &str, stage: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Asha Rao",
        "stage": stage,
        "createdAt": "2025-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn test_update_puts_patch_to_item_path() -> anyhow::Result<()> {
    let client = Arc::new(ScriptedApiClient::new().respond(200, lead_json("L-1", "contacted")));
    let gateway = LeadGateway::new(client.clone());

    let lead = gateway.update("L-1", LeadPatch::stage("contacted")).await?;

    assert_eq!(lead.stage, "contacted");
    assert_eq!(client.request_lines(), vec!["PUT /leads/L-1"]);
    assert_eq!(client.requests()[0].body, Some(json!({ "stage": "contacted" })));
    Ok(())
}

#[tokio::test]
async fn test_error_bodies_are_normalized() {
    let client = Arc::new(
        ScriptedApiClient::new()
            .respond(400, json!({ "detail": "invalid transition" }))
            .respond(
                422,
                json!({ "detail": [
                    { "msg": "field required", "loc": ["body", "stage"], "type": "missing" },
                    { "msg": "too long", "loc": ["body", "name"], "type": "value_error" }
                ]}),
            )
            .respond(404, json!({}))
            .respond(500, json!({ "message": "boom" }))
            .respond(502, json!("bad gateway"))
            .fail("connection refused"),
    );
    let gateway = LeadGateway::new(client.clone());

    let mut errors = Vec::new();
    for _ in 0..6 {
        errors.push(gateway.update("L-1", LeadPatch::stage("closed")).await.err());
    }

    assert_eq!(
        errors,
        vec![
            Some(MutationError::Rejected("invalid transition".to_string())),
            Some(MutationError::Validation(vec![
                "field required".to_string(),
                "too long".to_string()
            ])),
            Some(MutationError::NotFound),
            Some(MutationError::Unknown(Some("boom".to_string()))),
            Some(MutationError::Unknown(Some("HTTP 502".to_string()))),
            Some(MutationError::Transport("connection refused".to_string())),
        ]
    );
    assert_eq!(
        errors[1].as_ref().map(|e| e.user_message("fallback")),
        Some("field required, too long".to_string())
    );
}

#[tokio::test]
async fn test_list_accepts_wrapped_leads() -> anyhow::Result<()> {
    let client = Arc::new(ScriptedApiClient::new().respond(
        200,
        json!({ "leads": [lead_json("L-1", "initial"), lead_json("L-2", "closed")] }),
    ));
    let gateway = LeadGateway::new(client.clone());

    let leads = gateway.list().await?;

    assert_eq!(leads.len(), 2);
    assert_eq!(client.request_lines(), vec!["GET /leads/"]);
    Ok(())
}

#[tokio::test]
async fn test_delete_and_department_paths() -> anyhow::Result<()> {
    let client = Arc::new(
        ScriptedApiClient::new()
            .respond(204, serde_json::Value::Null)
            .respond(
                201,
                json!({ "id": "dept-9", "name": "Visa", "description": "Visa desk", "is_active": true }),
            ),
    );
    let leads = LeadGateway::new(client.clone());
    let departments = DepartmentGateway::new(client.clone());

    leads.delete("L-1").await?;
    let created = departments
        .create(DepartmentDraft {
            name: "Visa".to_string(),
            description: "Visa desk".to_string(),
            is_active: true,
        })
        .await?;

    assert_eq!(created.id, "dept-9");
    assert!(!created.is_predefined);
    assert_eq!(
        client.request_lines(),
        vec!["DELETE /leads/L-1", "POST /admin/departments/"]
    );
    Ok(())
}

#[tokio::test]
async fn test_options_are_sorted_by_order() -> anyhow::Result<()> {
    let client = ScriptedApiClient::new().respond(
        200,
        json!({ "stages": [
            { "name": "closed", "display_name": "Closed", "sort_order": 3 },
            { "name": "initial", "display_name": "Initial", "sort_order": 1 }
        ]}),
    );

    let options = fetch_options(&client, Classification::Stage).await?;

    let names: Vec<_> = options.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["initial", "closed"]);
    assert_eq!(client.request_lines(), vec!["GET /stages/active"]);
    Ok(())
}
