use uuid::Uuid;

use crate::error::DomainError;

/// Storage folder for post featured images.
pub const POST_IMAGE_FOLDER: &str = "posts";
/// Storage folder for user avatars.
pub const AVATAR_FOLDER: &str = "avatars";

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Lowercased extension of an uploaded image, if it is an accepted type.
pub fn image_extension(original_name: &str) -> Result<String, DomainError> {
    let ext = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(DomainError::Validation(
            "only .jpg, .jpeg and .png images are allowed".to_string(),
        ))
    }
}

/// Random storage name keeping the validated extension.
pub fn stored_image_name(ext: &str) -> String {
    format!("{}.{ext}", Uuid::new_v4().simple())
}

/// A stored file name must be a single path component.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !name.contains('\0')
}

/// MIME type served for a stored image.
pub fn image_content_type(name: &str) -> &'static str {
    match image_extension(name).as_deref() {
        Ok("png") => "image/png",
        Ok(_) => "image/jpeg",
        Err(_) => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("cat.JPG").unwrap(), "jpg");
        assert_eq!(image_extension("a.b.png").unwrap(), "png");
        assert!(image_extension("doc.pdf").is_err());
        assert!(image_extension("noext").is_err());
    }

    #[test]
    fn test_stored_name_shape() {
        let name = stored_image_name("png");
        let (stem, ext) = name.split_once('.').unwrap();
        assert_eq!(stem.len(), 32);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(ext, "png");
    }

    #[test]
    fn test_safe_file_name() {
        assert!(is_safe_file_name("abc.png"));
        assert!(!is_safe_file_name("../etc/passwd"));
        assert!(!is_safe_file_name(".hidden"));
        assert!(!is_safe_file_name("a\\b.png"));
        assert!(!is_safe_file_name(""));
    }
}
