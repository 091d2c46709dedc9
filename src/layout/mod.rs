use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::blob::{Blob, BlobError};
use crate::image::{self, ComposeError, ImageBuffer, Placement};
use crate::package::{ContainerPackager, PackageEntry, PackageError};


// offsets required by the boot ROM and the default partition table
pub const BOOTLOADER_OFFSET: u32 = 0x1000;
pub const PARTITION_TABLE_OFFSET: u32 = 0x8000;
pub const CALIBRATION_OFFSET: u32 = 0xF000;
pub const APP_OFFSET: u32 = 0x10000;
/// Region in front of the application that is always emitted, erased where nothing is placed.
pub const BOOT_REGION: u32 = 0x10000;

pub const PAYLOAD_TYPE: u8 = 1;
pub const PAYLOAD_ICON: u8 = 231;
pub const PAYLOAD_LABEL: &str = "payload";
pub const INSTALLER_TYPE: u8 = 0;
pub const INSTALLER_ICON: u8 = 0;
pub const INSTALLER_LABEL: &str = "installer";

pub const DEFAULT_PROJECT: &str = "odroid-go-multi-firmware";
pub const DEFAULT_DESCRIPTION: &str = "Multi-fw installer";

/// Build outputs combined into the flat image.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LayoutPaths
{
	pub app: PathBuf,
	pub bootloader: PathBuf,
	pub partition_table: PathBuf,
	pub calibration: PathBuf,
}

impl LayoutPaths
{
	/// Locations the SDK build writes to inside `build_dir`.
	pub fn from_build_dir(build_dir: impl AsRef<Path>, project: &str) -> Self
	{
		let build_dir = build_dir.as_ref();
		Self
		{
			app: build_dir.join(format!("{project}.bin")),
			bootloader: build_dir.join("bootloader").join("bootloader.bin"),
			partition_table: build_dir.join("partition_table").join("partition-table.bin"),
			calibration: build_dir.join("phy_init_data.bin"),
		}
	}
}

/// Naming of the produced artifacts, `version` is usually a `YYYYMMDD` date stamp.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PackageConfig
{
	pub project: String,
	pub version: String,
	pub description: String,
	pub out_dir: PathBuf,
}

impl PackageConfig
{
	pub fn new(project: impl Into<String>, version: impl Into<String>) -> Self
	{
		Self{project: project.into(), version: version.into(), description: DEFAULT_DESCRIPTION.to_owned(), out_dir: PathBuf::new()}
	}
	
	pub fn image_path(&self) -> PathBuf
	{
		self.out_dir.join(format!("{}-{}.img", self.project, self.version))
	}
	
	pub fn container_path(&self) -> PathBuf
	{
		self.out_dir.join(format!("{}-{}.fw", self.project, self.version))
	}
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Artifacts
{
	pub image: PathBuf,
	pub container: PathBuf,
}

fn read_input(path: &Path) -> Result<Blob, LayoutError>
{
	match Blob::read(path)
	{
		Ok(blob) => Ok(blob),
		Err(BlobError::Missing{path}) => Err(LayoutError::MissingInput{path}),
		Err(err) => Err(LayoutError::Input(err)),
	}
}

/// Composes bootloader, partition table, calibration data and application at their fixed offsets.
pub fn build_image(paths: &LayoutPaths) -> Result<Vec<u8>, LayoutError>
{
	let placements = [
		Placement::new(BOOTLOADER_OFFSET, read_input(&paths.bootloader)?),
		Placement::new(PARTITION_TABLE_OFFSET, read_input(&paths.partition_table)?),
		Placement::new(CALIBRATION_OFFSET, read_input(&paths.calibration)?),
		Placement::new(APP_OFFSET, read_input(&paths.app)?),
	];
	let mut buf = ImageBuffer::new(image::FLASH_CAPACITY);
	buf.claim(BOOT_REGION).map_err(|err| ComposeError::OutOfBounds{origin: PathBuf::from("<boot region>"), err})?;
	image::compose_into(&mut buf, &placements)?;
	Ok(buf.into_bytes())
}

/// Container entries in install order: the flat image first so installing it cannot clobber the
/// installer entry that is written after it.
pub fn entries(image: &Path, app: &Path) -> [PackageEntry; 2]
{
	[
		PackageEntry::new(PAYLOAD_TYPE, PAYLOAD_ICON, PAYLOAD_LABEL, image),
		PackageEntry::new(INSTALLER_TYPE, INSTALLER_ICON, INSTALLER_LABEL, app),
	]
}

fn write_file(path: &Path, data: &[u8]) -> Result<(), LayoutError>
{
	let res = OpenOptions::new().write(true).create(true).truncate(true).open(path)
		.and_then(|mut f| f.write_all(data));
	res.map_err(|err| LayoutError::Write{path: path.to_path_buf(), err})
}

/// Builds the flat image, writes it and wraps it together with the application into an installer
/// container.
pub fn package_firmware(paths: &LayoutPaths, config: &PackageConfig, packager: &dyn ContainerPackager) -> Result<Artifacts, LayoutError>
{
	if !paths.app.is_file()
	{
		return Err(LayoutError::MissingInput{path: paths.app.clone()});
	}
	
	let image_path = config.image_path();
	info!("creating img file {}", image_path.display());
	let data = build_image(paths)?;
	write_file(&image_path, &data)?;
	info!("{} successfully created ({} bytes)", image_path.display(), data.len());
	
	let container_path = config.container_path();
	info!("creating fw file {}", container_path.display());
	// the application binary doubles as the container tile
	packager.package_entries(&container_path, &config.description, &paths.app, &entries(&image_path, &paths.app))?;
	Ok(Artifacts{image: image_path, container: container_path})
}

#[derive(Debug, Error)]
pub enum LayoutError
{
	#[error("missing input file {}", path.display())]
	MissingInput{path: PathBuf},
	#[error("could not load input")]
	Input(#[source] BlobError),
	#[error("could not compose flat image")]
	Compose(#[from] ComposeError),
	#[error("could not write {}", path.display())]
	Write{path: PathBuf, #[source] err: io::Error},
	#[error("packaging failed")]
	PackagingFailed(#[from] PackageError),
}
