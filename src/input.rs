//! Loading statement templates and building the workload.
//!
//! Statements are gathered in this order:
//! 1. `statements` of the `--workload` file
//! 2. the positional argument, trimmed and split on `;`
//! 3. standard input with `--stdin`, each line trimmed and split on `;`

use std::io::BufRead;

use anyhow::Context;
use workload_core::{split_statements, CommonWorkloadArgs, Workload, WorkloadConfig};

/// Read `;`-separated statements line by line.
pub fn read_statements<R: BufRead>(reader: R) -> anyhow::Result<Vec<String>> {
    let mut statements = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read statements from stdin")?;
        statements.extend(split_statements(line.trim()));
    }
    Ok(statements)
}

/// Build the workload described by the arguments.
///
/// `stdin` is only read when `--stdin` is set.
pub fn build_workload<R: BufRead>(args: &CommonWorkloadArgs, stdin: R) -> anyhow::Result<Workload> {
    let (mut templates, base) = match args.load_file()? {
        Some(file) => (file.statements, file.config),
        None => (Vec::new(), WorkloadConfig::default()),
    };

    if let Some(sqls) = &args.sqls {
        templates.extend(split_statements(sqls.trim()));
    }
    if args.stdin {
        templates.extend(read_statements(stdin)?);
    }

    let config = args.apply(base)?;
    let workload = Workload::new(templates, &config).context("Invalid workload")?;
    Ok(workload)
}
