//! Ownership rules shared by the mutation services and the read models.

use crate::entities::{like, photo};

pub fn can_edit(photo: &photo::Model, user_id: i64) -> bool {
    photo.user_id == user_id
}

pub fn can_delete(photo: &photo::Model, user_id: i64) -> bool {
    photo.user_id == user_id
}

pub fn can_delete_like(like: &like::Model, user_id: i64) -> bool {
    like.user_id == user_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn photo_owned_by(user_id: i64) -> photo::Model {
        photo::Model {
            id: 1,
            user_id,
            image: "https://images.example.com/1.jpg".to_string(),
            caption: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn only_owner_can_edit_or_delete() {
        let photo = photo_owned_by(7);

        assert!(can_edit(&photo, 7));
        assert!(can_delete(&photo, 7));
        assert!(!can_edit(&photo, 8));
        assert!(!can_delete(&photo, 8));
    }

    #[test]
    fn only_liker_can_remove_like() {
        let like = like::Model {
            id: 3,
            photo_id: 1,
            user_id: 5,
            created_at: Utc::now(),
        };

        assert!(can_delete_like(&like, 5));
        assert!(!can_delete_like(&like, 7));
    }
}
