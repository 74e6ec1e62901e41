use icon_extractor::{
    output_path, ExtractorError, IconProvider, IconSourceRequest, LinkResolver, Pipeline,
    PlatformAbstractionError, PngFileWriter, RawIcon, ResizeSpec,
};
use std::cell::Cell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const WHITE: [u8; 4] = [255, 255, 255, 255];
const RED: [u8; 4] = [255, 0, 0, 255];

#[derive(Default)]
struct FakeLinks {
    targets: HashMap<PathBuf, PathBuf>,
}

impl LinkResolver for FakeLinks {
    fn resolve_link(&self, link: &Path) -> Result<Option<PathBuf>, PlatformAbstractionError> {
        Ok(self.targets.get(link).cloned())
    }
}

/// Hands out a 32x32 icon with a white background and a red square for every
/// file it knows about.
#[derive(Default)]
struct FakeIcons {
    known: Vec<PathBuf>,
    association_requests: Cell<usize>,
}

impl FakeIcons {
    fn knowing(paths: &[&Path]) -> Self {
        Self {
            known: paths.iter().map(|p| p.to_path_buf()).collect(),
            ..Default::default()
        }
    }
}

impl IconProvider for FakeIcons {
    fn associated_icon(&self, file: &Path) -> Result<Option<RawIcon>, PlatformAbstractionError> {
        self.association_requests.set(self.association_requests.get() + 1);
        if !self.known.iter().any(|known| known == file) {
            return Ok(None);
        }

        let rgba = (0..32u32 * 32)
            .flat_map(|i| {
                let (x, y) = (i % 32, i / 32);
                if (8..24).contains(&x) && (8..24).contains(&y) {
                    RED
                } else {
                    WHITE
                }
            })
            .collect();

        Ok(Some(RawIcon::Container(ico::IconImage::from_rgba_data(32, 32, rgba))))
    }
}

fn write_ico(path: &Path, sizes: &[u32]) {
    let mut directory = ico::IconDir::new(ico::ResourceType::Icon);
    for size in sizes {
        // Transparent frame around an opaque center
        let rgba = (0..size * size)
            .flat_map(|i| {
                let (x, y) = (i % size, i / size);
                let border = x == 0 || y == 0 || x == size - 1 || y == size - 1;
                if border {
                    [0, 0, 0, 0]
                } else {
                    [0, 0, 255, 255]
                }
            })
            .collect();

        let image = ico::IconImage::from_rgba_data(*size, *size, rgba);
        directory.add_entry(ico::IconDirEntry::encode(&image).unwrap());
    }

    directory.write(fs::File::create(path).unwrap()).unwrap();
}

struct DecodedPng {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

fn read_png(path: &Path) -> DecodedPng {
    let decoder = png::Decoder::new(fs::File::open(path).unwrap());
    let mut reader = decoder.read_info().unwrap();
    let mut rgba = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut rgba).unwrap();
    rgba.truncate(info.buffer_size());

    assert_eq!(info.color_type, png::ColorType::Rgba);
    DecodedPng {
        width: info.width,
        height: info.height,
        rgba,
    }
}

#[test]
fn executable_without_resize_has_transparent_background() {
    let dir = tempfile::tempdir().unwrap();
    let exe = dir.path().join("app.exe");
    fs::write(&exe, b"MZ").unwrap();
    let out_dir = dir.path().join("out");

    let icons = FakeIcons::knowing(&[exe.as_path()]);
    let output = output_path(&out_dir, &exe, None);
    Pipeline::new(&FakeLinks::default(), &icons, &PngFileWriter)
        .run(&IconSourceRequest::new(&exe), &output)
        .unwrap();

    assert_eq!(output, out_dir.join("app.png"));
    let png = read_png(&output);
    assert_eq!((png.width, png.height), (32, 32));

    let pixels = png.rgba.chunks_exact(4).collect::<Vec<_>>();
    assert_eq!(pixels[0], [0, 0, 0, 0]);
    assert_eq!(pixels[16 * 32 + 16], RED);
}

#[test]
fn shortcut_is_resized_from_target_icon() {
    let dir = tempfile::tempdir().unwrap();
    let tool = dir.path().join("bin").join("tool.exe");
    fs::create_dir_all(tool.parent().unwrap()).unwrap();
    fs::write(&tool, b"MZ").unwrap();
    let link = dir.path().join("shortcut.lnk");
    fs::write(&link, b"L").unwrap();

    let links = FakeLinks {
        targets: HashMap::from([(link.clone(), tool.clone())]),
    };
    let icons = FakeIcons::knowing(&[tool.as_path()]);

    let mut request = IconSourceRequest::new(&link);
    request.resize = ResizeSpec::new(64);

    let output = output_path(dir.path(), &link, None);
    Pipeline::new(&links, &icons, &PngFileWriter)
        .run(&request, &output)
        .unwrap();

    assert_eq!(output, dir.path().join("shortcut.png"));
    assert_eq!(icons.association_requests.get(), 1);

    let png = read_png(&output);
    assert_eq!((png.width, png.height), (64, 64));
    // No transparency pass after resizing, the white background survives
    assert_eq!(&png.rgba[..4], &WHITE);
}

#[test]
fn container_picks_nearest_then_resizes() {
    let dir = tempfile::tempdir().unwrap();
    let ico = dir.path().join("icon.ico");
    write_ico(&ico, &[16, 32, 40, 64]);

    let links = FakeLinks::default();
    let icons = FakeIcons::default();
    let pipeline = Pipeline::new(&links, &icons, &PngFileWriter);

    let mut request = IconSourceRequest::new(&ico);
    request.desired_size = 48;

    let native = pipeline.render(&request).unwrap();
    assert_eq!((native.width(), native.height()), (40, 40));

    request.resize = ResizeSpec::new(32);
    let resized = pipeline.render(&request).unwrap();
    assert_eq!((resized.width(), resized.height()), (32, 32));
    assert_eq!(icons.association_requests.get(), 0);
}

#[test]
fn container_alpha_survives_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let ico = dir.path().join("icon.ico");
    write_ico(&ico, &[16]);

    let output = dir.path().join("icon.png");
    Pipeline::new(&FakeLinks::default(), &FakeIcons::default(), &PngFileWriter)
        .run(&IconSourceRequest::new(&ico), &output)
        .unwrap();

    let png = read_png(&output);
    for (i, pixel) in png.rgba.chunks_exact(4).enumerate() {
        let (x, y) = (i as u32 % 16, i as u32 / 16);
        let border = x == 0 || y == 0 || x == 15 || y == 15;
        assert_eq!(pixel[3] == 0, border, "alpha changed at {x},{y}");
    }
}

#[test]
fn sibling_icon_takes_precedence() {
    let dir = tempfile::tempdir().unwrap();
    let exe = dir.path().join("app.exe");
    fs::write(&exe, b"MZ").unwrap();
    write_ico(&dir.path().join("app.ico"), &[24]);

    let icons = FakeIcons::knowing(&[exe.as_path()]);
    let mut request = IconSourceRequest::new(&exe);
    request.search_sibling_icon = true;

    let buffer = Pipeline::new(&FakeLinks::default(), &icons, &PngFileWriter)
        .render(&request)
        .unwrap();

    assert_eq!((buffer.width(), buffer.height()), (24, 24));
    assert_eq!(icons.association_requests.get(), 0);
}

#[test]
fn missing_association_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("data.xyz");
    fs::write(&file, b"").unwrap();

    let output = dir.path().join("out").join("data.png");
    let err = Pipeline::new(&FakeLinks::default(), &FakeIcons::default(), &PngFileWriter)
        .run(&IconSourceRequest::new(&file), &output)
        .unwrap_err();

    assert!(matches!(err, ExtractorError::NoAssociatedIcon(_)));
    assert!(!output.exists());
    assert!(!output.parent().unwrap().exists());
}

#[test]
fn broken_shortcut_is_unresolved() {
    let dir = tempfile::tempdir().unwrap();
    let link = dir.path().join("broken.lnk");
    fs::write(&link, b"L").unwrap();

    let output = dir.path().join("broken.png");
    let err = Pipeline::new(&FakeLinks::default(), &FakeIcons::default(), &PngFileWriter)
        .run(&IconSourceRequest::new(&link), &output)
        .unwrap_err();

    assert!(matches!(err, ExtractorError::SourceUnresolved));
    assert!(!output.exists());
}

#[test]
fn missing_input_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.exe");

    let err = Pipeline::new(&FakeLinks::default(), &FakeIcons::default(), &PngFileWriter)
        .render(&IconSourceRequest::new(&missing))
        .unwrap_err();

    assert!(matches!(err, ExtractorError::FileNotFound(ref p) if *p == missing));
}

#[test]
fn write_failures_are_output_errors() {
    let dir = tempfile::tempdir().unwrap();
    let exe = dir.path().join("app.exe");
    fs::write(&exe, b"MZ").unwrap();

    let output = dir.path().join("app.png");
    fs::create_dir(&output).unwrap();

    let icons = FakeIcons::knowing(&[exe.as_path()]);
    let err = Pipeline::new(&FakeLinks::default(), &icons, &PngFileWriter)
        .run(&IconSourceRequest::new(&exe), &output)
        .unwrap_err();

    assert!(matches!(err, ExtractorError::Output { ref path, .. } if *path == output));
}
