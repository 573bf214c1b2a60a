//! Project documents as users write them.

/// Two tasks on one variant, with a function and all three hooks.
pub const WELL_FORMED: &str = r#"
identifier: gantry
display_name: Gantry
batchtime: 60
command_type: test

pre:
  - command: shell.track
post:
  - command: attach.xunit_results
    params:
      file: src/results/*.xml
timeout:
  command: shell.exec
  params:
    script: ps aux

functions:
  fetch source:
    - command: git.get_project
      params:
        directory: ${workdir}/src
    - command: git.apply_patch
      params:
        directory: ${workdir}/src

tasks:
  - name: compile
    commands:
      - func: fetch source
      - command: shell.exec
        type: system
        params:
          working_dir: src
          script: make build
      - command: archive.targz_pack
        params:
          target: build.tgz
          source_dir: src/build
          include:
            - "./**"
      - command: s3.put
        params:
          aws_key: ${aws_key}
          aws_secret: ${aws_secret}
          local_file: build.tgz
          remote_file: builds/${build_id}.tgz
          bucket: gantry-artifacts
          content_type: application/x-gzip
          permissions: public-read

  - name: test
    depends_on:
      - name: compile
    commands:
      - func: fetch source
      - command: s3.get
        params:
          aws_key: ${aws_key}
          aws_secret: ${aws_secret}
          remote_file: builds/${build_id}.tgz
          bucket: gantry-artifacts
          extract_to: src/build
      - command: gotest.run
        params:
          working_dir: src
          tests:
            - dir: ./...
              args: -race

buildvariants:
  - name: linux
    display_name: Linux
    run_on:
      - ubuntu2204
    expansions:
      workdir: /data/mci
    tasks:
      - name: compile
      - name: test
  - name: windows
    display_name: Windows
    run_on:
      - windows-2022
    tasks:
      - name: compile
      - name: test
        depends_on:
          - name: compile
            variant: linux
"#;

/// Distros referenced by [`WELL_FORMED`].
pub const WELL_FORMED_DISTROS: &[&str] = &["ubuntu2204", "windows-2022"];

/// A document with one problem of each common kind.
pub const BROKEN: &str = r#"
identifier: broken
batchtime: -5

functions:
  outer:
    func: inner
  inner:
    command: shell.exec
    params:
      script: make

tasks:
  - name: compile
    depends_on:
      - name: test
    commands:
      - command: a.b
  - name: test
    depends_on:
      - name: compile
      - name: compile
    commands: []

buildvariants:
  - name: linux
    run_on:
      - nowhere
    tasks:
      - name: compile
      - name: test
      - name: ghost
"#;
