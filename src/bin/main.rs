fn main() -> owl_merge::Result<()> {
    owl_merge::cli::main()
}
