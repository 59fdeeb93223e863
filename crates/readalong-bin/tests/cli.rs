use predicates::prelude::*;

#[test]
fn words_from_stdin() {
    assert_cmd::Command::cargo_bin("readalong")
        .unwrap()
        .arg("words")
        .arg("--class")
        .arg("hl")
        .write_stdin("Solve 3.14 now")
        .assert()
        .success()
        .stdout(
            "<span class='hl'>Solve</span>\n <span class='hl'>3.14</span>\n <span class='hl'>now</span>\n",
        );
}

#[test]
fn paragraphs_use_default_class() {
    assert_cmd::Command::cargo_bin("readalong")
        .unwrap()
        .arg("paragraphs")
        .write_stdin("<p>Hi</p>")
        .assert()
        .success()
        .stdout("<p class='readalong'>Hi</p>\n");
}

#[test]
fn unknown_entity_fails() {
    assert_cmd::Command::cargo_bin("readalong")
        .unwrap()
        .arg("sentences")
        .write_stdin("what is &zzz; here")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not recognized"));
}
