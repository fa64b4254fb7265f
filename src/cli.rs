/// interactive menu and batch checking of equations given on the command line
pub mod cli_main;
