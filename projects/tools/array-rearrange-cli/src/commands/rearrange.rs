use crate::{error::CliError, util::parse_list};
use argh::FromArgs;
use array_rearrange::ArrayRearrangeHelper;
use tracing::{debug, info};

#[derive(FromArgs, Debug)]
/// Rearrange a list of integers and print the result
#[argh(subcommand, name = "rearrange")]
pub struct RearrangeCmd {
    /// comma separated values to rearrange, e.g. 1,2,3,4,5
    #[argh(option)]
    pub values: String,

    /// comma separated field lengths in source order, e.g. 2,3
    #[argh(option)]
    pub fields: String,

    /// comma separated field indices in destination order, e.g. 1,0
    #[argh(option)]
    pub order: String,

    /// total number of fields; when one more than the number of lengths given, the last field
    /// receives all remaining values [default: number of lengths]
    #[argh(option)]
    pub field_count: Option<usize>,
}

pub fn handle_rearrange_command(cmd: RearrangeCmd) -> Result<(), CliError> {
    let values = parse_list::<i64>("values", &cmd.values)?;
    let lengths = parse_list::<usize>("fields", &cmd.fields)?;
    let order = parse_list::<i64>("order", &cmd.order)?;

    let field_count = cmd.field_count.unwrap_or(lengths.len());
    let mut helper = ArrayRearrangeHelper::new(values.len(), field_count);
    for &length in &lengths {
        helper.add_field(length)?;
    }
    helper.finish()?;
    debug!(fields = ?helper.partition().fields(), "built partition");

    let mut output = vec![0; values.len()];
    helper.rearrange_into(&mut output, &values, &order)?;
    info!(count = values.len(), fields = field_count, "rearranged values");

    let joined: Vec<String> = output.iter().map(ToString::to_string).collect();
    println!("{}", joined.join(","));
    Ok(())
}
