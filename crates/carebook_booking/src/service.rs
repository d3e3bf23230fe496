// --- File: crates/carebook_booking/src/service.rs ---
//! Collaborators of the booking flow.
//!
//! [`BookingStore`] reads providers and creates bookings against the content
//! API, [`NotificationService`] asks the mail endpoint to send the
//! confirmation. Both come with an HTTP implementation and a mock.

use carebook_common::services::BoxFuture;
use carebook_common::{create_client, post};
use carebook_config::BookingConfig;
use carebook_slots::Appointment;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ServiceError;
use crate::models::{BookingPayload, ConfirmationMail, CreatedBooking};
use crate::provider::{AboutContent, ProviderDetail};

/// Timeout for calls to the content API.
pub const REQUEST_TIMEOUT_SECS: u64 = 15;
const PROVIDERS_PATH: &str = "api/doctors";
const APPOINTMENTS_PATH: &str = "api/appointments";

/// Reads providers and persists bookings.
pub trait BookingStore: Send + Sync {
    /// Loads a provider together with its existing appointments.
    fn fetch_provider(&self, provider_id: &str) -> BoxFuture<'_, ProviderDetail, ServiceError>;

    /// Creates a booking record and returns what the API stored.
    fn create_booking(&self, payload: BookingPayload)
        -> BoxFuture<'_, CreatedBooking, ServiceError>;
}

/// Sends booking confirmations.
pub trait NotificationService: Send + Sync {
    fn send_confirmation(&self, mail: ConfirmationMail) -> BoxFuture<'_, (), ServiceError>;
}

// Content API envelopes: `{ "data": { "id": .., "attributes": { .. } } }`.

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct Entity<A> {
    #[serde(default)]
    id: Option<Value>,
    attributes: A,
}

// `Many` goes first: a derived struct also accepts a sequence.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_first(self) -> Option<T> {
        match self {
            OneOrMany::One(item) => Some(item),
            OneOrMany::Many(items) => items.into_iter().next(),
        }
    }

    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

#[derive(Deserialize)]
struct Relation<T> {
    data: Option<OneOrMany<T>>,
}

impl<T> Relation<T> {
    fn first(self) -> Option<T> {
        self.data.and_then(OneOrMany::into_first)
    }

    fn all(self) -> Vec<T> {
        self.data.map(OneOrMany::into_vec).unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct NamedAttributes {
    #[serde(default, rename = "Name", alias = "Provider_name", alias = "name")]
    name: Option<String>,
}

#[derive(Deserialize)]
struct MediaAttributes {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Deserialize)]
struct ProviderAttributes {
    #[serde(rename = "Name", alias = "Provider_name", alias = "name")]
    name: String,
    #[serde(default, rename = "Open_time", alias = "StartTime")]
    open_time: Option<String>,
    #[serde(default, rename = "Address")]
    address: Option<String>,
    #[serde(default)]
    price: Option<Value>,
    #[serde(default, rename = "About")]
    about: Option<AboutContent>,
    #[serde(default)]
    image: Option<Relation<Entity<MediaAttributes>>>,
    #[serde(default, alias = "categories")]
    category: Option<Relation<Entity<NamedAttributes>>>,
    #[serde(default, alias = "bookings")]
    appointments: Option<Relation<Entity<AppointmentAttributes>>>,
}

#[derive(Deserialize)]
struct AppointmentAttributes {
    #[serde(default, rename = "Date")]
    date: Option<String>,
    #[serde(default, rename = "Time")]
    time: Option<String>,
    #[serde(default, rename = "Username")]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default, rename = "Note")]
    note: Option<String>,
    #[serde(default)]
    doctor: Option<Relation<Entity<NamedAttributes>>>,
}

fn id_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn price_value(price: &Value) -> Option<f64> {
    match price {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl Entity<ProviderAttributes> {
    fn into_provider(self, requested_id: &str) -> ProviderDetail {
        let id = self
            .id
            .as_ref()
            .map(id_string)
            .unwrap_or_else(|| requested_id.to_string());
        let attrs = self.attributes;

        let appointments = attrs
            .appointments
            .map(Relation::all)
            .unwrap_or_default()
            .into_iter()
            .map(|entity| {
                let a = entity.attributes;
                Appointment {
                    date: a.date.unwrap_or_default(),
                    time: a.time.unwrap_or_default(),
                    provider_id: Some(id.clone()),
                    username: a.username,
                    email: a.email,
                    note: a.note,
                }
            })
            .collect();

        ProviderDetail {
            name: attrs.name,
            open_time: attrs.open_time,
            address: attrs.address,
            category: attrs
                .category
                .and_then(Relation::first)
                .and_then(|c| c.attributes.name),
            price: attrs.price.as_ref().and_then(price_value),
            image_url: attrs
                .image
                .and_then(Relation::first)
                .and_then(|i| i.attributes.url),
            about: attrs.about.unwrap_or_default(),
            appointments,
            id,
        }
    }
}

impl Entity<AppointmentAttributes> {
    fn into_created(self) -> CreatedBooking {
        let attrs = self.attributes;
        CreatedBooking {
            id: self.id.as_ref().map(id_string),
            username: attrs.username,
            email: attrs.email,
            date: attrs.date,
            time: attrs.time,
            note: attrs.note,
            provider_name: attrs
                .doctor
                .and_then(Relation::first)
                .and_then(|d| d.attributes.name),
        }
    }
}

async fn error_from_response(response: Response) -> ServiceError {
    let status_code = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|e| format!("unreadable error body: {}", e));
    ServiceError::ApiError {
        status_code,
        message,
    }
}

/// [`BookingStore`] backed by the content API over HTTP.
pub struct HttpBookingStore {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpBookingStore {
    pub fn new(client: Client, base_url: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn from_config(config: &BookingConfig) -> Result<Self, ServiceError> {
        let client = create_client(REQUEST_TIMEOUT_SECS, true)?;
        Ok(Self::new(
            client,
            config.api_base_url.clone(),
            config.api_token.clone(),
        ))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl BookingStore for HttpBookingStore {
    fn fetch_provider(&self, provider_id: &str) -> BoxFuture<'_, ProviderDetail, ServiceError> {
        let provider_id = provider_id.to_string();

        Box::pin(async move {
            let url = self.url(&format!("{}/{}", PROVIDERS_PATH, provider_id));
            debug!("Fetching provider {} from {}", provider_id, url);

            let response = self
                .authorize(self.client.get(&url).query(&[("populate", "*")]))
                .send()
                .await?;

            if response.status() == StatusCode::NOT_FOUND {
                return Err(ServiceError::NotFound(format!("provider {}", provider_id)));
            }
            if !response.status().is_success() {
                return Err(error_from_response(response).await);
            }

            let body = response.text().await?;
            let envelope: Envelope<Entity<ProviderAttributes>> = serde_json::from_str(&body)?;
            Ok(envelope.data.into_provider(&provider_id))
        })
    }

    fn create_booking(
        &self,
        payload: BookingPayload,
    ) -> BoxFuture<'_, CreatedBooking, ServiceError> {
        Box::pin(async move {
            let url = self.url(APPOINTMENTS_PATH);
            let response = self
                .authorize(
                    self.client
                        .post(&url)
                        .query(&[("populate", "*")])
                        .json(&payload),
                )
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(error_from_response(response).await);
            }

            let body = response.text().await?;
            let envelope: Envelope<Entity<AppointmentAttributes>> = serde_json::from_str(&body)?;
            let created = envelope.data.into_created();
            info!(
                "Booking {:?} created for {} at {}",
                created.id, payload.data.date, payload.data.time
            );
            Ok(created)
        })
    }
}

/// [`NotificationService`] that posts the confirmation to a mail endpoint.
pub struct HttpNotificationService {
    endpoint: String,
}

impl HttpNotificationService {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &BookingConfig) -> Self {
        Self::new(config.mail_endpoint.clone())
    }
}

impl NotificationService for HttpNotificationService {
    fn send_confirmation(&self, mail: ConfirmationMail) -> BoxFuture<'_, (), ServiceError> {
        Box::pin(async move {
            let response = post(&self.endpoint, &mail).await?;
            if !response.status().is_success() {
                return Err(error_from_response(response).await);
            }
            debug!("Confirmation mail accepted for {}", mail.email);
            Ok(())
        })
    }
}

pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, MutexGuard, PoisonError};

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// In-memory store. Created bookings are appended to the provider's appointments.
    #[derive(Default)]
    pub struct MockBookingStore {
        providers: Mutex<HashMap<String, ProviderDetail>>,
        created: Mutex<Vec<BookingPayload>>,
        failure: Mutex<Option<String>>,
    }

    impl MockBookingStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_provider(self, provider: ProviderDetail) -> Self {
            lock(&self.providers).insert(provider.id.clone(), provider);
            self
        }

        /// Makes every following `create_booking` fail with `message`.
        pub fn fail_bookings(&self, message: impl Into<String>) {
            *lock(&self.failure) = Some(message.into());
        }

        /// Payloads received by `create_booking`, failed ones included.
        pub fn created_payloads(&self) -> Vec<BookingPayload> {
            lock(&self.created).clone()
        }
    }

    impl BookingStore for MockBookingStore {
        fn fetch_provider(&self, provider_id: &str) -> BoxFuture<'_, ProviderDetail, ServiceError> {
            let provider_id = provider_id.to_string();
            Box::pin(async move {
                let provider = lock(&self.providers).get(&provider_id).cloned();
                provider.ok_or_else(|| ServiceError::NotFound(format!("provider {}", provider_id)))
            })
        }

        fn create_booking(
            &self,
            payload: BookingPayload,
        ) -> BoxFuture<'_, CreatedBooking, ServiceError> {
            Box::pin(async move {
                let sequence = {
                    let mut created = lock(&self.created);
                    created.push(payload.clone());
                    created.len()
                };

                if let Some(message) = lock(&self.failure).clone() {
                    return Err(ServiceError::ApiError {
                        status_code: 500,
                        message,
                    });
                }

                let data = payload.data;
                let mut providers = lock(&self.providers);
                let provider_name = providers.get_mut(&data.doctor).map(|provider| {
                    provider.appointments.push(Appointment {
                        date: data.date.clone(),
                        time: data.time.clone(),
                        provider_id: Some(data.doctor.clone()),
                        username: Some(data.username.clone()),
                        email: Some(data.email.clone()),
                        note: Some(data.note.clone()),
                    });
                    provider.name.clone()
                });

                Ok(CreatedBooking {
                    id: Some(sequence.to_string()),
                    username: Some(data.username),
                    email: Some(data.email),
                    date: Some(data.date),
                    time: Some(data.time),
                    note: Some(data.note),
                    provider_name,
                })
            })
        }
    }

    /// Records every confirmation instead of sending it.
    #[derive(Default)]
    pub struct MockNotificationService {
        sent: Mutex<Vec<ConfirmationMail>>,
        failing: AtomicBool,
    }

    impl MockNotificationService {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            let service = Self::default();
            service.failing.store(true, Ordering::SeqCst);
            service
        }

        pub fn sent(&self) -> Vec<ConfirmationMail> {
            lock(&self.sent).clone()
        }
    }

    impl NotificationService for MockNotificationService {
        fn send_confirmation(&self, mail: ConfirmationMail) -> BoxFuture<'_, (), ServiceError> {
            Box::pin(async move {
                lock(&self.sent).push(mail);
                if self.failing.load(Ordering::SeqCst) {
                    return Err(ServiceError::ApiError {
                        status_code: 503,
                        message: "mail endpoint unavailable".to_string(),
                    });
                }
                Ok(())
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_mapping_from_content_api() {
        let body = r#"{
            "data": {
                "id": 3,
                "attributes": {
                    "Name": "Dr. Anil Kumar",
                    "Address": "12 MG Road",
                    "StartTime": "10:00 AM",
                    "price": "650",
                    "About": [{"type": "paragraph", "children": [{"text": "Kind"}, {"text": "and calm."}]}],
                    "image": {"data": [{"id": 1, "attributes": {"url": "https://cdn.example/a.png"}}]},
                    "categories": {"data": {"id": 2, "attributes": {"Name": "Cardiologist"}}},
                    "appointments": {"data": [
                        {"id": 11, "attributes": {"Date": "2024-06-01", "Time": "10:00 AM", "Username": "Asha Rao"}},
                        {"id": 12, "attributes": {"Date": null, "Time": "11:00 AM"}}
                    ]}
                }
            }
        }"#;

        let envelope: Envelope<Entity<ProviderAttributes>> = serde_json::from_str(body).unwrap();
        let provider = envelope.data.into_provider("3");

        assert_eq!(provider.id, "3");
        assert_eq!(provider.name, "Dr. Anil Kumar");
        assert_eq!(provider.open_time.as_deref(), Some("10:00 AM"));
        assert_eq!(provider.price, Some(650.0));
        assert_eq!(provider.category.as_deref(), Some("Cardiologist"));
        assert_eq!(provider.image_url.as_deref(), Some("https://cdn.example/a.png"));
        assert_eq!(provider.appointments.len(), 2);
        assert_eq!(provider.appointments[0].username.as_deref(), Some("Asha Rao"));
        assert_eq!(provider.appointments[1].date, "");
        assert_eq!(crate::provider::render_about(&provider.about), vec!["Kind and calm."]);
    }

    #[test]
    fn test_service_provider_mapping_uses_provider_name() {
        let body = r#"{"data": {"id": "svc-1", "attributes": {"Provider_name": "Glow Salon", "Open_time": "9 AM", "price": 300}}}"#;
        let envelope: Envelope<Entity<ProviderAttributes>> = serde_json::from_str(body).unwrap();
        let provider = envelope.data.into_provider("svc-1");

        assert_eq!(provider.id, "svc-1");
        assert_eq!(provider.name, "Glow Salon");
        assert_eq!(provider.open_time.as_deref(), Some("9 AM"));
        assert_eq!(provider.price, Some(300.0));
        assert!(provider.appointments.is_empty());
    }

    #[test]
    fn test_empty_relations_map_to_nothing() {
        let body = r#"{"data": {"id": 5, "attributes": {
            "Name": "Dr. Meera Iyer",
            "image": {},
            "categories": {"data": null},
            "appointments": {"data": []}
        }}}"#;
        let envelope: Envelope<Entity<ProviderAttributes>> = serde_json::from_str(body).unwrap();
        let provider = envelope.data.into_provider("5");

        assert!(provider.image_url.is_none());
        assert!(provider.category.is_none());
        assert!(provider.appointments.is_empty());
    }

    #[test]
    fn test_created_booking_mapping_reads_doctor_name() {
        let body = r#"{"data": {"id": 41, "attributes": {
            "Username": "Asha Rao", "email": "asha@example.com",
            "Date": "2024-06-01", "Time": "1:30 PM", "Note": "",
            "doctor": {"data": {"id": 3, "attributes": {"Name": "Dr. Anil Kumar"}}}
        }}}"#;
        let envelope: Envelope<Entity<AppointmentAttributes>> = serde_json::from_str(body).unwrap();
        let created = envelope.data.into_created();

        assert_eq!(created.id.as_deref(), Some("41"));
        assert_eq!(created.provider_name.as_deref(), Some("Dr. Anil Kumar"));
        assert_eq!(created.time.as_deref(), Some("1:30 PM"));
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let store = HttpBookingStore::new(Client::new(), "http://localhost:1337/", Some("  ".into()));
        assert!(store.api_token.is_none());
        assert_eq!(store.url("api/appointments"), "http://localhost:1337/api/appointments");
    }
}
