use std::ffi::OsString;

use super::*;

fn entries() -> Vec<PackageEntry>
{
	vec![
		PackageEntry::new(1, 231, "payload", "fw-20240101.img"),
		PackageEntry::new(0, 0, "installer", "build/fw.bin"),
	]
}

fn os(args: &[&str]) -> Vec<OsString>
{
	args.iter().map(OsString::from).collect()
}

#[test]
fn validate_fields()
{
	assert!(validate("Multi-fw installer", &entries()).is_ok());
	assert!(matches!(validate("Multi-fw installer", &[]), Err(PackageError::NoEntries)));
	
	let long = "x".repeat(DESCRIPTION_LEN + 1);
	assert!(matches!(validate(&long, &entries()), Err(PackageError::Field{field: "description", max: DESCRIPTION_LEN, ..})));
	assert!(validate(&"x".repeat(DESCRIPTION_LEN), &entries()).is_ok());
	
	let mut named = entries();
	named[1].label = "a-very-long-installer".to_owned();
	match validate("desc", &named)
	{
		Err(PackageError::Field{field, value, max}) =>
		{
			assert_eq!(field, "label");
			assert_eq!(value, "a-very-long-installer");
			assert_eq!(max, LABEL_LEN);
		},
		r => panic!("unexpected result {r:?}"),
	}
}

#[test]
fn argument_order()
{
	let tool = ExternalPackager::script("python3", "tools/mkfw.py");
	let args = tool.arguments(Path::new("fw-20240101.fw"), "Multi-fw installer", Path::new("build/fw.bin"), &entries());
	assert_eq!(tool.program(), Path::new("python3"));
	assert_eq!(args, os(&[
		"tools/mkfw.py",
		"fw-20240101.fw", "Multi-fw installer", "build/fw.bin",
		"1", "231", "0", "payload", "fw-20240101.img",
		"0", "0", "0", "installer", "build/fw.bin",
	]));
	
	let bare = ExternalPackager::new("mkfw");
	let args = bare.arguments(Path::new("out.fw"), "d", Path::new("t.bin"), &entries()[..1]);
	assert_eq!(args, os(&["out.fw", "d", "t.bin", "1", "231", "0", "payload", "fw-20240101.img"]));
}

#[test]
fn failure_message()
{
	let err = PackageError::NoEntries;
	assert_eq!(err.code(), None);
	assert_eq!(err.to_string(), "container needs at least one entry");
}

#[test]
fn spawn_failure()
{
	let dir = tempfile::tempdir().unwrap();
	let tool = ExternalPackager::new(dir.path().join("no-such-tool"));
	match tool.package_entries(&dir.path().join("out.fw"), "desc", Path::new("t.bin"), &entries())
	{
		Err(PackageError::Spawn{program, ..}) => assert_eq!(program, dir.path().join("no-such-tool")),
		r => panic!("unexpected result {r:?}"),
	}
}

#[cfg(unix)]
mod unix
{
	use std::fs;
	
	use super::*;
	
	#[test]
	fn success()
	{
		let tool = ExternalPackager::new("true");
		tool.package_entries(Path::new("out.fw"), "desc", Path::new("t.bin"), &entries()).unwrap();
	}
	
	#[test]
	fn exit_code_and_stderr()
	{
		let tool = ExternalPackager::new("sh").arg("-c").arg("echo 'tile too large' >&2; exit 3").arg("mkfw");
		match tool.package_entries(Path::new("out.fw"), "desc", Path::new("t.bin"), &entries())
		{
			Err(err @ PackageError::Failed{..}) =>
			{
				assert_eq!(err.code(), Some(3));
				let msg = err.to_string();
				assert!(msg.starts_with("sh failed ("), "{msg}");
				assert!(msg.ends_with(": tile too large"), "{msg}");
			},
			r => panic!("unexpected result {r:?}"),
		}
	}
	
	#[test]
	fn receives_arguments()
	{
		let dir = tempfile::tempdir().unwrap();
		let record = dir.path().join("args.txt");
		let tool = ExternalPackager::new("sh").arg("-c").arg(r#"printf '%s\n' "$@" > "$0""#).arg(&record);
		tool.package_entries(Path::new("out.fw"), "Multi-fw installer", Path::new("t.bin"), &entries()).unwrap();
		let lines = fs::read_to_string(&record).unwrap();
		assert_eq!(lines.lines().collect::<Vec<_>>(), [
			"out.fw", "Multi-fw installer", "t.bin",
			"1", "231", "0", "payload", "fw-20240101.img",
			"0", "0", "0", "installer", "build/fw.bin",
		]);
	}
	
	#[test]
	fn invalid_entries_skip_the_tool()
	{
		let dir = tempfile::tempdir().unwrap();
		let marker = dir.path().join("ran");
		let tool = ExternalPackager::new("sh").arg("-c").arg(r#"touch "$0""#).arg(&marker);
		assert!(matches!(tool.package_entries(Path::new("out.fw"), "desc", Path::new("t.bin"), &[]), Err(PackageError::NoEntries)));
		assert!(!marker.exists());
	}
}
