use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use leadgrid_types::{
    Classification, ClassificationOption, Department, DepartmentDraft, DepartmentList, Lead,
    LeadPatch, LeadStats, NewLead, StagesResponse, StatusesResponse, parse_lead_list,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::{ApiClient, ApiRequest, ApiResponse};
use crate::gateway::{MutationError, MutationResult, RowGateway};

/// An entity served under a REST collection path.
pub trait RestEntity: Send + Sync + 'static {
    /// Collection path with trailing slash, e.g. `/leads/`
    const COLLECTION: &'static str;

    type Row: DeserializeOwned + Send;
    type Draft: Serialize + Send + 'static;
    type Patch: Serialize + Send + 'static;

    /// Decode a list payload.
    fn decode_list(body: Value) -> MutationResult<Vec<Self::Row>> {
        serde_json::from_value(body).map_err(|e| MutationError::Unknown(Some(e.to_string())))
    }
}

pub struct Leads;

impl RestEntity for Leads {
    const COLLECTION: &'static str = "/leads/";
    type Row = Lead;
    type Draft = NewLead;
    type Patch = LeadPatch;

    fn decode_list(body: Value) -> MutationResult<Vec<Lead>> {
        let bytes =
            serde_json::to_vec(&body).map_err(|e| MutationError::Unknown(Some(e.to_string())))?;
        parse_lead_list(&bytes).map_err(|e| MutationError::Unknown(Some(e.to_string())))
    }
}

pub struct Departments;

impl RestEntity for Departments {
    const COLLECTION: &'static str = "/admin/departments/";
    type Row = Department;
    type Draft = DepartmentDraft;
    type Patch = DepartmentDraft;

    fn decode_list(body: Value) -> MutationResult<Vec<Department>> {
        if body.is_array() {
            return serde_json::from_value(body)
                .map_err(|e| MutationError::Unknown(Some(e.to_string())));
        }
        let list: DepartmentList = serde_json::from_value(body)
            .map_err(|e| MutationError::Unknown(Some(e.to_string())))?;
        Ok(list.departments)
    }
}

/// Row gateway over an [`ApiClient`] for entity `E`.
pub struct RestGateway<C, E> {
    client: Arc<C>,
    entity: PhantomData<fn() -> E>,
}

impl<C, E> Clone for RestGateway<C, E> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            entity: PhantomData,
        }
    }
}

impl<C: ApiClient, E: RestEntity> RestGateway<C, E> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            entity: PhantomData,
        }
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    fn item_path(id: &str) -> String {
        format!("{}{}", E::COLLECTION, id)
    }

    pub async fn list(&self) -> MutationResult<Vec<E::Row>> {
        let body = send(self.client.as_ref(), ApiRequest::get(E::COLLECTION)).await?;
        E::decode_list(body)
    }

    pub async fn get(&self, id: &str) -> MutationResult<E::Row> {
        let body = send(self.client.as_ref(), ApiRequest::get(Self::item_path(id))).await?;
        decode(body)
    }
}

pub type LeadGateway<C> = RestGateway<C, Leads>;
pub type DepartmentGateway<C> = RestGateway<C, Departments>;

#[async_trait]
impl<C: ApiClient, E: RestEntity> RowGateway for RestGateway<C, E> {
    type Row = E::Row;
    type Draft = E::Draft;
    type Patch = E::Patch;

    async fn create(&self, draft: E::Draft) -> MutationResult<E::Row> {
        let body = to_body(&draft)?;
        let response = send(self.client.as_ref(), ApiRequest::post(E::COLLECTION, body)).await?;
        decode(response)
    }

    async fn update(&self, id: &str, patch: E::Patch) -> MutationResult<E::Row> {
        let body = to_body(&patch)?;
        let response =
            send(self.client.as_ref(), ApiRequest::put(Self::item_path(id), body)).await?;
        decode(response)
    }

    async fn delete(&self, id: &str) -> MutationResult<()> {
        send(self.client.as_ref(), ApiRequest::delete(Self::item_path(id))).await?;
        Ok(())
    }
}

/// Fetch the active options of a classification (`/stages/active`,
/// `/statuses/active`).
pub async fn fetch_options<C: ApiClient + ?Sized>(
    client: &C,
    classification: Classification,
) -> MutationResult<Vec<ClassificationOption>> {
    let path = match classification {
        Classification::Stage => "/stages/active",
        Classification::Status => "/statuses/active",
    };
    let body = send(client, ApiRequest::get(path)).await?;
    let mut options = match classification {
        Classification::Stage => decode::<StagesResponse>(body)?.stages,
        Classification::Status => decode::<StatusesResponse>(body)?.statuses,
    };
    options.sort_by_key(|o| o.sort_order);
    Ok(options)
}

/// Dashboard counters; multi-assignment breakdown only when asked for.
pub async fn fetch_lead_stats<C: ApiClient + ?Sized>(
    client: &C,
    include_multi_assignment_stats: bool,
) -> MutationResult<LeadStats> {
    let path = format!(
        "/leads/stats?include_multi_assignment_stats={}",
        include_multi_assignment_stats
    );
    let body = send(client, ApiRequest::get(path)).await?;
    decode(body)
}

pub(crate) async fn send<C: ApiClient + ?Sized>(
    client: &C,
    request: ApiRequest,
) -> MutationResult<Value> {
    debug!(request = %request, "api request");
    let label = request.to_string();
    let response = client
        .send(request)
        .await
        .map_err(|e| MutationError::Transport(e.0))?;
    into_body(&label, response)
}

fn into_body(label: &str, response: ApiResponse) -> MutationResult<Value> {
    if response.is_success() {
        return Ok(response.body);
    }
    let err = MutationError::from_response(response.status, &response.body);
    warn!(request = label, status = response.status, error = %err, "api request failed");
    Err(err)
}

pub(crate) fn to_body<T: Serialize>(value: &T) -> MutationResult<Value> {
    serde_json::to_value(value).map_err(|e| MutationError::Unknown(Some(e.to_string())))
}

pub(crate) fn decode<T: DeserializeOwned>(body: Value) -> MutationResult<T> {
    serde_json::from_value(body).map_err(|e| MutationError::Unknown(Some(e.to_string())))
}
