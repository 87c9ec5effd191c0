use anyhow::Result;

use fmri_cli::config::{CliConfig, DesignOverrides};
use fmri_cli::pipeline::{
    InputSources, inspect_conditions, resolve_inputs, resolve_lss_target, run_lss as build_lss,
    run_standard, write_output,
};

use crate::cli::{Cli, ConditionsArgs, DesignArgs, LssArgs, RunArgs};
use crate::summary::{print_conditions, print_run_summary};

pub fn run_conditions(cli: &Cli, args: &ConditionsArgs) -> Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    let report = inspect_conditions(&args.events, config.separator(cli.separator))?;
    print_conditions(&report);
    Ok(())
}

pub fn run_design(cli: &Cli, args: &DesignArgs) -> Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    let options = config.design_options(&overrides(&args.run));
    let inputs = resolve_inputs(&sources(&args.run))?;

    let result = run_standard(inputs, config.separator(cli.separator), &options)?;
    write_output(&result, args.run.output.as_deref())?;
    print_run_summary(&result, args.run.output.as_deref());
    Ok(())
}

pub fn run_lss(cli: &Cli, args: &LssArgs) -> Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    let options = config.design_options(&overrides(&args.run));
    let inputs = resolve_inputs(&sources(&args.run))?;
    let target = resolve_lss_target(args.trial_id, args.all, &inputs)?;

    let result = build_lss(inputs, config.separator(cli.separator), &options, target)?;
    write_output(&result, args.run.output.as_deref())?;
    print_run_summary(&result, args.run.output.as_deref());
    Ok(())
}

fn sources(args: &RunArgs) -> InputSources {
    InputSources {
        bundle: args.inputs.clone(),
        scan: args.scan.clone(),
        events: args.events.clone(),
        regressors: args.regressors.clone(),
        sidecar: args.sidecar.clone(),
    }
}

fn overrides(args: &RunArgs) -> DesignOverrides {
    DesignOverrides {
        decimals: args.decimals,
        amplitude: args.amplitude,
        regressor_names: args.regressors_wanted.clone(),
        motion_columns: args.motion_columns.clone(),
        motion_file: args.motion_file.clone(),
    }
}
