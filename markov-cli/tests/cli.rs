use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn temp_workspace() -> TempDir {
	tempfile::tempdir().expect("create tempdir")
}

fn markovian(workspace: &TempDir) -> Command {
	let mut cmd = Command::cargo_bin("markovian").expect("binary exists");
	cmd.current_dir(workspace.path());
	cmd
}

fn read_json(workspace: &TempDir, name: &str) -> Value {
	let bytes = fs::read(workspace.path().join(name)).expect("read output");
	serde_json::from_slice(&bytes).expect("output is valid JSON")
}

#[test]
fn train_from_file_writes_json() {
	let workspace = temp_workspace();
	fs::write(
		workspace.path().join("posts.txt"),
		"The tree has two posts has two posts supporting it!",
	)
	.expect("write input");

	markovian(&workspace)
		.args(["--quiet", "train", "--data", "posts.txt"])
		.assert()
		.success();

	let chain = read_json(&workspace, "markov.json");
	assert_eq!(chain["Order"], 2);
	assert_eq!(chain["Knowledge"]["has$two"]["posts"], 2);
	assert_eq!(chain["Knowledge"]["two$posts"]["has"], 1);
	assert_eq!(chain["Knowledge"]["two$posts"]["supporting"], 1);
	assert_eq!(chain["Knowledge"]["supporting$it"]["!"], 1);
}

#[test]
fn train_from_stdin_and_resume() {
	let workspace = temp_workspace();

	markovian(&workspace)
		.args(["--quiet", "train", "--data", "stdin", "--order", "1", "-o", "chain.json"])
		.write_stdin("I see the tree built into the sidewalk.")
		.assert()
		.success();

	let chain = read_json(&workspace, "chain.json");
	assert_eq!(chain["Order"], 1);
	assert_eq!(chain["Knowledge"][""]["I"], 1);
	assert_eq!(chain["Knowledge"]["the"]["tree"], 1);
	assert_eq!(chain["Knowledge"]["the"]["sidewalk"], 1);
	assert_eq!(chain["Knowledge"]["sidewalk"]["."], 1);

	markovian(&workspace)
		.args(["--quiet", "train", "--data", "stdin", "--resume", "chain.json", "-o", "chain.json"])
		.write_stdin("I see the tree built into the sidewalk.")
		.assert()
		.success();

	let resumed = read_json(&workspace, "chain.json");
	assert_eq!(resumed["Knowledge"]["the"]["tree"], 2);
	assert_eq!(
		resumed["Knowledge"].as_object().map(|knowledge| knowledge.len()),
		chain["Knowledge"].as_object().map(|knowledge| knowledge.len())
	);
}

#[test]
fn binary_snapshot_can_be_inspected() {
	let workspace = temp_workspace();

	markovian(&workspace)
		.args(["--quiet", "train", "--data", "stdin", "--format", "bin"])
		.write_stdin("has two posts has two posts")
		.assert()
		.success();
	assert!(workspace.path().join("markov.bin").exists(), "format rewrote extension");

	let output = markovian(&workspace)
		.args(["--quiet", "info", "markov.bin", "--top", "1"])
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();
	let text = String::from_utf8(output).expect("info output is UTF-8");
	assert!(text.contains("Order:        2"), "{text}");
	assert!(text.contains("Observations: 6"), "{text}");
	assert!(text.contains("[has two] x2 -> \"posts\" (2)"), "{text}");
}

#[test]
fn rejects_missing_data_and_bad_order() {
	let workspace = temp_workspace();

	markovian(&workspace).args(["--quiet", "train"]).assert().failure();
	markovian(&workspace)
		.args(["--quiet", "train", "--data", "stdin", "--order", "0"])
		.write_stdin("words")
		.assert()
		.failure();
	markovian(&workspace)
		.args(["--quiet", "train", "--data", "stdin", "--order", "-1"])
		.write_stdin("words")
		.assert()
		.failure();
	let output = markovian(&workspace)
		.args(["--quiet", "train", "--data", "absent.txt"])
		.assert()
		.failure()
		.get_output()
		.stderr
		.clone();
	let stderr = String::from_utf8(output).expect("stderr is UTF-8");
	assert!(stderr.contains("couldn't open absent.txt"), "{stderr}");

	assert!(!workspace.path().join("markov.json").exists());
}

#[test]
fn resume_rejects_order_mismatch() {
	let workspace = temp_workspace();

	markovian(&workspace)
		.args(["--quiet", "train", "--data", "stdin", "--order", "3"])
		.write_stdin("a coat on one post")
		.assert()
		.success();

	markovian(&workspace)
		.args(["--quiet", "train", "--data", "stdin", "--order", "2", "--resume", "markov.json"])
		.write_stdin("another post")
		.assert()
		.failure();
}

#[test]
fn explicit_out_path_is_kept_with_format() {
	let workspace = temp_workspace();

	markovian(&workspace)
		.args(["--quiet", "train", "--data", "stdin", "--out", "chain.dat", "--format", "bin"])
		.write_stdin("has two posts has two posts")
		.assert()
		.success();
	assert!(workspace.path().join("chain.dat").exists(), "wrote the requested path");
	assert!(!workspace.path().join("chain.bin").exists(), "did not rename the output");

	markovian(&workspace)
		.args(["--quiet", "train", "--data", "stdin", "--format", "bin"])
		.args(["--resume", "chain.dat", "--out", "chain.dat"])
		.write_stdin("has two posts")
		.assert()
		.success();

	let output = markovian(&workspace)
		.args(["--quiet", "info", "chain.dat", "--format", "bin"])
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();
	let text = String::from_utf8(output).expect("info output is UTF-8");
	assert!(text.contains("Observations: 9"), "{text}");

	markovian(&workspace)
		.args(["--quiet", "info", "chain.dat"])
		.assert()
		.failure();
}

#[test]
fn rust_log_controls_verbosity_without_flags() {
	let workspace = temp_workspace();

	let output = markovian(&workspace)
		.env("RUST_LOG", "debug")
		.args(["train", "--data", "stdin"])
		.write_stdin("The dog")
		.assert()
		.success()
		.get_output()
		.stderr
		.clone();
	let stderr = String::from_utf8(output).expect("stderr is UTF-8");
	assert!(stderr.contains("training order-2 chain"), "{stderr}");

	let output = markovian(&workspace)
		.env_remove("RUST_LOG")
		.args(["train", "--data", "stdin"])
		.write_stdin("The dog")
		.assert()
		.success()
		.get_output()
		.stderr
		.clone();
	let stderr = String::from_utf8(output).expect("stderr is UTF-8");
	assert!(!stderr.contains("training order-2 chain"), "{stderr}");
	assert!(stderr.contains("saved order-2 chain"), "{stderr}");
}
