use assert_fs::prelude::*;
use assert_fs::TempDir;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use webpify::{
    Dimensions, ImageEditor, Journal, Level, MemoryConfig, Outcome, OutputFormat, SettingValue,
    Storage, UploadDescriptor, UploadTransformer, WebpifyError, KEY_DELETE_ORIGINALS,
    KEY_MAX_HEIGHT, KEY_MAX_WIDTH, KEY_QUALITY,
};

#[derive(Debug, Clone, PartialEq)]
enum EditorOp {
    Load(PathBuf),
    Resize { max_width: u32, max_height: u32, crop: bool },
    SetQuality(u8),
    Encode { output: PathBuf, format: OutputFormat },
}

/// Records every call; `encode` writes a placeholder file.
struct FakeEditor {
    dimensions: Dimensions,
    fail_load: bool,
    fail_encode: bool,
    ops: Mutex<Vec<EditorOp>>,
}

impl FakeEditor {
    fn sized(width: u32, height: u32) -> Self {
        Self {
            dimensions: Dimensions::new(width, height),
            fail_load: false,
            fail_encode: false,
            ops: Mutex::new(Vec::new()),
        }
    }

    fn ops(&self) -> Vec<EditorOp> {
        self.ops.lock().unwrap().clone()
    }

    fn resize_calls(&self) -> Vec<EditorOp> {
        self.ops()
            .into_iter()
            .filter(|op| matches!(op, EditorOp::Resize { .. }))
            .collect()
    }
}

impl ImageEditor for FakeEditor {
    type Handle = Dimensions;

    fn load(&self, path: &Path) -> webpify::Result<Dimensions> {
        self.ops.lock().unwrap().push(EditorOp::Load(path.to_path_buf()));
        if self.fail_load {
            return Err(WebpifyError::ProcessingError("corrupt header".to_string()));
        }
        Ok(self.dimensions)
    }

    fn size(&self, handle: &Dimensions) -> Dimensions {
        *handle
    }

    fn resize(&self, handle: &mut Dimensions, max_width: u32, max_height: u32, crop: bool) {
        self.ops.lock().unwrap().push(EditorOp::Resize { max_width, max_height, crop });
        *handle = Dimensions::new(handle.width.min(max_width), handle.height.min(max_height));
    }

    fn set_quality(&self, _handle: &mut Dimensions, quality: u8) {
        self.ops.lock().unwrap().push(EditorOp::SetQuality(quality));
    }

    fn encode(&self, _handle: &Dimensions, output: &Path, format: OutputFormat) -> webpify::Result<()> {
        self.ops.lock().unwrap().push(EditorOp::Encode {
            output: output.to_path_buf(),
            format,
        });
        if self.fail_encode {
            return Err(WebpifyError::ProcessingError("disk full".to_string()));
        }
        std::fs::write(output, b"RIFF....WEBP")?;
        Ok(())
    }
}

/// Real filesystem operations, with an optional "unavailable" switch for moves.
#[derive(Default)]
struct FakeStorage {
    move_unavailable: bool,
    deleted: Mutex<Vec<PathBuf>>,
    moved: Mutex<Vec<(PathBuf, PathBuf)>>,
}

impl Storage for FakeStorage {
    fn delete(&self, path: &Path) {
        self.deleted.lock().unwrap().push(path.to_path_buf());
        let _ = std::fs::remove_file(path);
    }

    fn move_file(&self, from: &Path, to: &Path) -> bool {
        if self.move_unavailable {
            return false;
        }
        self.moved.lock().unwrap().push((from.to_path_buf(), to.to_path_buf()));
        std::fs::rename(from, to).is_ok()
    }
}

#[derive(Default)]
struct MemoryJournal {
    lines: Mutex<Vec<(Level, String)>>,
}

impl MemoryJournal {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().iter().map(|(_, l)| l.clone()).collect()
    }

    fn warnings(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, _)| *level == Level::Warn)
            .map(|(_, l)| l.clone())
            .collect()
    }
}

impl Journal for MemoryJournal {
    fn record(&self, level: Level, message: &str) {
        self.lines.lock().unwrap().push((level, message.to_string()));
    }
}

fn config(max_width: i64, max_height: i64, quality: i64, delete_originals: bool) -> MemoryConfig {
    MemoryConfig::new()
        .with(KEY_MAX_WIDTH, SettingValue::Int(max_width))
        .with(KEY_MAX_HEIGHT, SettingValue::Int(max_height))
        .with(KEY_QUALITY, SettingValue::Int(quality))
        .with(KEY_DELETE_ORIGINALS, SettingValue::Bool(delete_originals))
}

fn upload(dir: &TempDir, name: &str, mime: &str) -> UploadDescriptor {
    let file = dir.child(name);
    file.write_binary(b"original bytes").unwrap();
    UploadDescriptor::new(
        file.path(),
        format!("https://example.com/wp-content/uploads/2024/05/{}", name),
        mime,
    )
}

fn transformer(
    editor: FakeEditor,
    storage: FakeStorage,
) -> UploadTransformer<FakeEditor, FakeStorage, MemoryJournal> {
    UploadTransformer::new(editor, storage, MemoryJournal::default())
}

#[test]
fn test_failed_upload_is_returned_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let input = upload(&temp_dir, "photo.jpg", "image/jpeg").with_error("File exceeds upload_max_filesize");

    let t = transformer(FakeEditor::sized(3000, 2000), FakeStorage::default());
    let (output, outcome) = t.transform_with_outcome(input.clone(), &MemoryConfig::new());

    assert_eq!(output, input);
    assert_eq!(outcome, Outcome::PassedThrough);
    assert!(t.editor().ops().is_empty());
    assert_eq!(t.journal().warnings().len(), 1);
    assert!(t.journal().lines()[0].contains("File exceeds upload_max_filesize"));
}

#[test]
fn test_unsupported_types_are_skipped_silently() {
    let temp_dir = TempDir::new().unwrap();

    for mime in ["image/gif", "image/webp", "IMAGE/JPEG", "application/pdf"] {
        let input = upload(&temp_dir, "anim.gif", mime);
        let t = transformer(FakeEditor::sized(10, 10), FakeStorage::default());

        let (output, outcome) = t.transform_with_outcome(input.clone(), &MemoryConfig::new());

        assert_eq!(output, input);
        assert_eq!(outcome, Outcome::Skipped);
        assert!(t.editor().ops().is_empty());
        assert!(t.journal().lines().is_empty());
    }
}

#[test]
fn test_load_failure_keeps_original() {
    let temp_dir = TempDir::new().unwrap();
    let input = upload(&temp_dir, "broken.png", "image/png");
    let mut editor = FakeEditor::sized(10, 10);
    editor.fail_load = true;

    let t = transformer(editor, FakeStorage::default());
    let (output, outcome) = t.transform_with_outcome(input.clone(), &MemoryConfig::new());

    assert_eq!(output, input);
    assert_eq!(outcome, Outcome::LoadFailed);
    assert!(input.file.exists());
    let warnings = t.journal().warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].starts_with("Failed to load image editor for: broken.png"));
    assert!(warnings[0].contains("corrupt header"));
}

#[test]
fn test_encode_failure_keeps_original() {
    let temp_dir = TempDir::new().unwrap();
    let input = upload(&temp_dir, "photo.jpg", "image/jpeg");
    let mut editor = FakeEditor::sized(100, 100);
    editor.fail_encode = true;

    let t = transformer(editor, FakeStorage::default());
    let (output, outcome) = t.transform_with_outcome(input.clone(), &config(2300, 2300, 90, true));

    assert_eq!(output, input);
    assert_eq!(outcome, Outcome::EncodeFailed);
    assert!(input.file.exists());
    assert!(t.storage().deleted.lock().unwrap().is_empty());
    assert!(t.journal().warnings()[0].starts_with("Failed to save WebP to: photo.webp"));
}

#[test]
fn test_small_image_is_not_resized_but_still_encoded() {
    let temp_dir = TempDir::new().unwrap();
    let input = upload(&temp_dir, "small.jpg", "image/jpeg");

    let t = transformer(FakeEditor::sized(2300, 2300), FakeStorage::default());
    t.transform(input, &config(2300, 2300, 75, true));

    let ops = t.editor().ops();
    assert!(t.editor().resize_calls().is_empty());
    assert!(ops.contains(&EditorOp::SetQuality(75)));
    assert!(ops.iter().any(|op| matches!(op, EditorOp::Encode { .. })));
    assert!(t
        .journal()
        .lines()
        .contains(&"No resizing needed. Dimensions: 2300x2300 are within limits.".to_string()));
}

#[test]
fn test_one_oversized_side_triggers_a_single_resize() {
    let temp_dir = TempDir::new().unwrap();

    for (width, height) in [(2301, 10), (10, 2301), (5000, 5000)] {
        let input = upload(&temp_dir, "tall.png", "image/png");
        let t = transformer(FakeEditor::sized(width, height), FakeStorage::default());

        t.transform(input, &config(2300, 2300, 90, true));

        assert_eq!(
            t.editor().resize_calls(),
            vec![EditorOp::Resize { max_width: 2300, max_height: 2300, crop: false }]
        );
    }
}

#[test]
fn test_quality_is_applied_before_encoding() {
    let temp_dir = TempDir::new().unwrap();
    let input = upload(&temp_dir, "q.jpg", "image/jpeg");

    let t = transformer(FakeEditor::sized(10, 10), FakeStorage::default());
    t.transform(input, &config(2300, 2300, -5, true));

    let ops = t.editor().ops();
    let quality_at = ops.iter().position(|op| *op == EditorOp::SetQuality(0)).unwrap();
    let encode_at = ops.iter().position(|op| matches!(op, EditorOp::Encode { .. })).unwrap();
    assert!(quality_at < encode_at);
}

#[test]
fn test_large_jpeg_is_resized_converted_and_deleted() {
    let temp_dir = TempDir::new().unwrap();
    let input = upload(&temp_dir, "photo.jpg", "image/jpeg");
    let original = input.file.clone();

    let t = transformer(FakeEditor::sized(3000, 2000), FakeStorage::default());
    let (output, outcome) = t.transform_with_outcome(input, &config(2300, 2300, 150, true));

    let expected = temp_dir.child("photo.webp");
    assert_eq!(outcome, Outcome::Deleted);
    assert_eq!(
        t.editor().ops(),
        vec![
            EditorOp::Load(original.clone()),
            EditorOp::Resize { max_width: 2300, max_height: 2300, crop: false },
            EditorOp::SetQuality(100),
            EditorOp::Encode {
                output: expected.path().to_path_buf(),
                format: OutputFormat::WebP
            },
        ]
    );

    assert!(!original.exists());
    assert!(expected.path().exists());
    assert_eq!(output.file, expected.path());
    assert_eq!(output.mime_type, "image/webp");
    assert_eq!(output.url, "https://example.com/wp-content/uploads/2024/05/photo.webp");
    assert_eq!(output.error, None);

    let lines = t.journal().lines();
    assert_eq!(lines[0], "Starting processing for image: photo.jpg");
    assert_eq!(lines[1], "Resizing image. Original: 3000x2000. Max: 2300x2300.");
    assert_eq!(lines[2], "Successfully converted to WebP: photo.webp");
    assert_eq!(lines[3], "Deleted original file: photo.jpg");
}

#[test]
fn test_png_is_kept_as_renamed_original() {
    let temp_dir = TempDir::new().unwrap();
    let input = upload(&temp_dir, "logo.png", "image/png");

    let t = transformer(FakeEditor::sized(800, 600), FakeStorage::default());
    let (output, outcome) = t.transform_with_outcome(input.clone(), &config(2300, 2300, 90, false));

    assert_eq!(outcome, Outcome::Renamed);
    assert!(t.editor().resize_calls().is_empty());
    assert!(!input.file.exists());
    assert!(temp_dir.child("logo_original.png").path().exists());
    assert!(temp_dir.child("logo.webp").path().exists());
    assert_eq!(
        *t.storage().moved.lock().unwrap(),
        vec![(input.file.clone(), temp_dir.child("logo_original.png").path().to_path_buf())]
    );
    assert_eq!(output.file, temp_dir.child("logo.webp").path());
    assert!(t
        .journal()
        .lines()
        .contains(&"Renamed original file to: logo_original.png".to_string()));
}

#[test]
fn test_unavailable_rename_keeps_original_in_place() {
    let temp_dir = TempDir::new().unwrap();
    let input = upload(&temp_dir, "logo.png", "image/png");
    let storage = FakeStorage {
        move_unavailable: true,
        ..FakeStorage::default()
    };

    let t = transformer(FakeEditor::sized(800, 600), storage);
    let (output, outcome) = t.transform_with_outcome(input.clone(), &config(2300, 2300, 90, false));

    assert_eq!(outcome, Outcome::RenameSkipped);
    assert!(outcome.converted());
    assert!(input.file.exists());
    assert!(!temp_dir.child("logo_original.png").path().exists());
    assert_eq!(output.file, temp_dir.child("logo.webp").path());
    assert_eq!(output.mime_type, "image/webp");
    assert_eq!(
        t.journal().warnings(),
        vec!["Storage not available. Failed to rename original file: logo_original.png".to_string()]
    );
}

#[test]
fn test_url_rewrite_is_literal_substring_replacement() {
    let temp_dir = TempDir::new().unwrap();
    let mut input = upload(&temp_dir, "a.jpg", "image/jpeg");
    input.url = "https://a.jpg.example.com/uploads/a.jpg".to_string();

    let t = transformer(FakeEditor::sized(10, 10), FakeStorage::default());
    let output = t.transform(input, &MemoryConfig::new());

    assert_eq!(output.url, "https://a.webp.example.com/uploads/a.webp");
}

#[test]
fn test_settings_are_read_on_every_call() {
    let temp_dir = TempDir::new().unwrap();
    let t = transformer(FakeEditor::sized(1000, 1000), FakeStorage::default());

    t.transform(upload(&temp_dir, "one.jpg", "image/jpeg"), &config(2300, 2300, 90, true));
    assert!(t.editor().resize_calls().is_empty());

    t.transform(upload(&temp_dir, "two.jpg", "image/jpeg"), &config(500, 500, 90, true));
    assert_eq!(
        t.editor().resize_calls(),
        vec![EditorOp::Resize { max_width: 500, max_height: 500, crop: false }]
    );
}

#[test]
fn test_upload_already_named_webp_is_not_disposed_of() {
    for delete_originals in [true, false] {
        let temp_dir = TempDir::new().unwrap();
        let input = upload(&temp_dir, "photo.webp", "image/jpeg");

        let t = transformer(FakeEditor::sized(800, 600), FakeStorage::default());
        let (output, outcome) = t.transform_with_outcome(input.clone(), &config(2300, 2300, 90, delete_originals));

        assert_eq!(outcome, Outcome::Overwritten);
        assert!(outcome.converted());
        assert_eq!(output.file, input.file);
        assert!(output.file.exists());
        assert_eq!(std::fs::read(&output.file).unwrap(), b"RIFF....WEBP");
        assert!(!temp_dir.child("photo_original.webp").path().exists());
        assert!(t.storage().deleted.lock().unwrap().is_empty());
        assert!(t.storage().moved.lock().unwrap().is_empty());
        assert_eq!(output.url, input.url);
        assert!(t
            .journal()
            .lines()
            .contains(&"Original file was replaced by the WebP output: photo.webp".to_string()));
    }
}
