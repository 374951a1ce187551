use async_trait::async_trait;
use contracts::domain::a001_hotel::HotelDto;
use contracts::domain::a002_room::RoomDto;
use contracts::shared::wizard::{FormFieldError, StepError, Wizard, WizardForm};
use contracts::usecases::u502_property_listing::{PropertyListingForm, PublishedListing};
use contracts::usecases::u503_umrah_package::{PublishedPackage, UmrahPackageForm};
use std::future::Future;
use thiserror::Error;

use crate::domain::{a001_hotel, a002_room, a004_umrah_package};
use crate::shared::uploads::{discard_uploads, WizardSubmission};

/// Why a wizard submission could not be published
#[derive(Debug, Error)]
pub enum PublishError {
    /// A text part could not be read back into the form
    #[error(transparent)]
    Field(#[from] FormFieldError),

    /// The submitted form does not pass a wizard step
    #[error(transparent)]
    Step(#[from] StepError),

    #[error("Failed to save listing: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Prepare and publish a submission.
///
/// Its stored uploads are removed when either step fails.
pub async fn publish_submission<F, T, Fut>(
    submission: WizardSubmission,
    prepare: impl FnOnce(WizardSubmission) -> Result<F, PublishError>,
    publish: impl FnOnce(F) -> Fut,
) -> Result<T, PublishError>
where
    Fut: Future<Output = Result<T, PublishError>>,
{
    let stored_files = submission.stored_files.clone();
    let result = match prepare(submission) {
        Ok(form) => publish(form).await,
        Err(e) => Err(e),
    };
    if result.is_err() && !stored_files.is_empty() {
        tracing::info!("Discarding {} unpublished upload(s)", stored_files.len());
        discard_uploads(&stored_files).await;
    }
    result
}

/// Rebuild a wizard form from a submission and run every step validator
pub fn prepare_form<F: WizardForm>(
    submission: WizardSubmission,
    attach_images: impl FnOnce(&mut F, Vec<String>),
) -> Result<F, PublishError> {
    let mut form = F::from_form_fields(&submission.fields)?;
    attach_images(&mut form, submission.image_urls);

    let wizard = Wizard::new(form);
    wizard.validate_all()?;
    Ok(wizard.into_form())
}

pub fn prepare_property_listing(
    submission: WizardSubmission,
) -> Result<PropertyListingForm, PublishError> {
    prepare_form(submission, |form: &mut PropertyListingForm, images| {
        form.images = images
    })
}

pub fn prepare_umrah_package(submission: WizardSubmission) -> Result<UmrahPackageForm, PublishError> {
    prepare_form(submission, |form: &mut UmrahPackageForm, images| {
        form.images = images
    })
}

/// Where a published listing is written
#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn create_hotel(&self, dto: HotelDto) -> anyhow::Result<String>;
    async fn create_room(&self, dto: RoomDto) -> anyhow::Result<String>;
    async fn delete_hotel(&self, id: &str) -> anyhow::Result<bool>;
    async fn delete_room(&self, id: &str) -> anyhow::Result<bool>;
}

/// Store backed by the domain services
pub struct DbListingStore;

#[async_trait]
impl ListingStore for DbListingStore {
    async fn create_hotel(&self, dto: HotelDto) -> anyhow::Result<String> {
        a001_hotel::service::create(dto).await
    }

    async fn create_room(&self, dto: RoomDto) -> anyhow::Result<String> {
        a002_room::service::create(dto).await
    }

    async fn delete_hotel(&self, id: &str) -> anyhow::Result<bool> {
        a001_hotel::service::delete(id).await
    }

    async fn delete_room(&self, id: &str) -> anyhow::Result<bool> {
        a002_room::service::delete(id).await
    }
}

/// Persist a validated property listing as a hotel with its rooms
pub async fn publish_property_listing(
    form: PropertyListingForm,
) -> Result<PublishedListing, PublishError> {
    publish_property_listing_to(&DbListingStore, form).await
}

/// Persist a listing through `store`.
///
/// If a room cannot be saved, the rooms saved so far and the hotel are
/// soft-deleted again and the room error is returned.
pub async fn publish_property_listing_to(
    store: &dyn ListingStore,
    form: PropertyListingForm,
) -> Result<PublishedListing, PublishError> {
    let hotel_dto = form.to_hotel_dto();
    let images = hotel_dto.images.clone();
    let hotel_id = store.create_hotel(hotel_dto).await?;
    tracing::info!("Published hotel {} ({})", hotel_id, form.name);

    let mut room_ids = Vec::with_capacity(form.rooms.len());
    for room_dto in form.to_room_dtos(&hotel_id) {
        match store.create_room(room_dto).await {
            Ok(room_id) => room_ids.push(room_id),
            Err(e) => {
                tracing::error!("Failed to save room of hotel {}: {}", hotel_id, e);
                withdraw_listing(store, &hotel_id, &room_ids).await;
                return Err(PublishError::Storage(e));
            }
        }
    }

    Ok(PublishedListing {
        hotel_id,
        room_ids,
        images,
    })
}

async fn withdraw_listing(store: &dyn ListingStore, hotel_id: &str, room_ids: &[String]) {
    for room_id in room_ids {
        if let Err(e) = store.delete_room(room_id).await {
            tracing::error!("Failed to withdraw room {} of hotel {}: {}", room_id, hotel_id, e);
        }
    }
    if let Err(e) = store.delete_hotel(hotel_id).await {
        tracing::error!("Failed to withdraw hotel {}: {}", hotel_id, e);
    }
    tracing::warn!(
        "Withdrew hotel {} and {} saved room(s)",
        hotel_id,
        room_ids.len()
    );
}

/// Persist a validated Umrah package
pub async fn publish_umrah_package(form: UmrahPackageForm) -> Result<PublishedPackage, PublishError> {
    let dto = form
        .to_package_dto()
        .ok_or_else(|| anyhow::anyhow!("Package dates are missing"))?;
    let images = dto.images.clone();
    let package_id = a004_umrah_package::service::create(dto).await?;
    tracing::info!("Published Umrah package {} ({})", package_id, form.title);

    Ok(PublishedPackage { package_id, images })
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::usecases::u502_property_listing::RoomDraft;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeStore {
        fail_room: Option<String>,
        rooms: Mutex<Vec<String>>,
        deleted: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ListingStore for FakeStore {
        async fn create_hotel(&self, _dto: HotelDto) -> anyhow::Result<String> {
            Ok("hotel-1".into())
        }

        async fn create_room(&self, dto: RoomDto) -> anyhow::Result<String> {
            if self.fail_room.as_deref() == Some(dto.room_type.as_str()) {
                anyhow::bail!("disk I/O error");
            }
            let mut rooms = self.rooms.lock().unwrap();
            let id = format!("room-{}", rooms.len() + 1);
            rooms.push(id.clone());
            Ok(id)
        }

        async fn delete_hotel(&self, id: &str) -> anyhow::Result<bool> {
            self.deleted.lock().unwrap().push(id.to_string());
            Ok(true)
        }

        async fn delete_room(&self, id: &str) -> anyhow::Result<bool> {
            self.deleted.lock().unwrap().push(id.to_string());
            Ok(true)
        }
    }

    fn listing_with_rooms(types: &[&str]) -> PropertyListingForm {
        let mut form = listing();
        form.images = vec!["/uploads/a.jpg".into()];
        form.rooms = types
            .iter()
            .map(|t| RoomDraft {
                room_type: t.to_string(),
                max_occupancy: 2,
                base_price: 100.0,
                quantity: 1,
                ..Default::default()
            })
            .collect();
        form
    }

    fn listing() -> PropertyListingForm {
        PropertyListingForm {
            name: "Zamzam Residence".into(),
            description: "Five minutes walk from the Haram gates".into(),
            star_rating: 4,
            street: "Ibrahim Al Khalil".into(),
            city: "Makkah".into(),
            country: "Saudi Arabia".into(),
            rooms: vec![RoomDraft {
                room_type: "Quad".into(),
                max_occupancy: 4,
                base_price: 150.0,
                quantity: 10,
                ..Default::default()
            }],
            check_in_time: "15:00".into(),
            check_out_time: "12:00".into(),
            ..Default::default()
        }
    }

    fn submission(form: &PropertyListingForm, images: &[&str]) -> WizardSubmission {
        WizardSubmission {
            fields: form.to_form_fields(),
            image_urls: images.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_prepare_attaches_uploaded_images() {
        let form = listing();
        let prepared =
            prepare_property_listing(submission(&form, &["/uploads/a.jpg", "/uploads/b.png"]))
                .unwrap();
        assert_eq!(prepared.name, form.name);
        assert_eq!(prepared.rooms, form.rooms);
        assert_eq!(prepared.images.len(), 2);
    }

    #[test]
    fn test_prepare_rejects_listing_without_photos() {
        let err = prepare_property_listing(submission(&listing(), &[])).unwrap_err();
        match err {
            PublishError::Step(step) => assert_eq!(step.field, "images"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_prepare_reports_unreadable_fields() {
        let mut fields = listing().to_form_fields();
        for (name, value) in fields.iter_mut() {
            if name == "rooms" {
                *value = "not json".into();
            }
        }
        let err = prepare_property_listing(WizardSubmission {
            fields,
            image_urls: vec!["/uploads/a.jpg".into()],
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, PublishError::Field(ref f) if f.field == "rooms"));
    }

    #[tokio::test]
    async fn test_publish_saves_hotel_and_rooms() {
        let store = FakeStore::default();
        let published = publish_property_listing_to(&store, listing_with_rooms(&["Double", "Quad"]))
            .await
            .unwrap();
        assert_eq!(published.hotel_id, "hotel-1");
        assert_eq!(published.room_ids, vec!["room-1", "room-2"]);
        assert_eq!(published.images, vec!["/uploads/a.jpg"]);
        assert!(store.deleted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_room_failure_withdraws_saved_rooms_and_hotel() {
        let store = FakeStore {
            fail_room: Some("Suite".into()),
            ..Default::default()
        };
        let err = publish_property_listing_to(
            &store,
            listing_with_rooms(&["Double", "Quad", "Suite"]),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PublishError::Storage(_)));
        assert_eq!(
            *store.deleted.lock().unwrap(),
            vec!["room-1", "room-2", "hotel-1"]
        );
    }

    fn stored_upload(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("listing-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, b"JPEG").unwrap();
        path
    }

    #[tokio::test]
    async fn test_rejected_submission_discards_uploads() {
        let path = stored_upload("a.jpg");
        let mut fields = listing().to_form_fields();
        fields.retain(|(name, _)| name != "name");
        let submission = WizardSubmission {
            fields,
            image_urls: vec!["/uploads/a.jpg".into()],
            stored_files: vec![path.clone()],
        };

        let store = FakeStore::default();

        let err = publish_submission(submission, prepare_property_listing, |form| {
            publish_property_listing_to(&store, form)
        })
        .await
        .unwrap_err();

        assert!(matches!(err, PublishError::Step(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_failed_save_discards_uploads() {
        let path = stored_upload("b.jpg");
        let form = listing_with_rooms(&["Suite"]);
        let submission = WizardSubmission {
            fields: form.to_form_fields(),
            image_urls: vec!["/uploads/b.jpg".into()],
            stored_files: vec![path.clone()],
        };
        let store = FakeStore {
            fail_room: Some("Suite".into()),
            ..Default::default()
        };

        let err = publish_submission(submission, prepare_property_listing, |form| {
            publish_property_listing_to(&store, form)
        })
        .await
        .unwrap_err();

        assert!(matches!(err, PublishError::Storage(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_published_submission_keeps_uploads() {
        let path = stored_upload("c.jpg");
        let form = listing_with_rooms(&["Double"]);
        let submission = WizardSubmission {
            fields: form.to_form_fields(),
            image_urls: vec!["/uploads/c.jpg".into()],
            stored_files: vec![path.clone()],
        };
        let store = FakeStore::default();

        let published = publish_submission(submission, prepare_property_listing, |form| {
            publish_property_listing_to(&store, form)
        })
        .await
        .unwrap();

        assert_eq!(published.images, vec!["/uploads/c.jpg"]);
        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }
}
