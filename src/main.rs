fn main() -> eyre::Result<()> {
    chatimg::main()
}
